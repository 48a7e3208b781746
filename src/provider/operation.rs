use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

/// Operation names the admin UI calls a data provider with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetList,
    GetOne,
    GetMany,
    GetManyReference,
    Create,
    Update,
    UpdateMany,
    Delete,
    DeleteMany,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::GetList,
        Operation::GetOne,
        Operation::GetMany,
        Operation::GetManyReference,
        Operation::Create,
        Operation::Update,
        Operation::UpdateMany,
        Operation::Delete,
        Operation::DeleteMany,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetList => "getList",
            Operation::GetOne => "getOne",
            Operation::GetMany => "getMany",
            Operation::GetManyReference => "getManyReference",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::UpdateMany => "updateMany",
            Operation::Delete => "delete",
            Operation::DeleteMany => "deleteMany",
        }
    }

    /// Whether view-routed resources can serve this operation.
    pub fn is_view_readable(&self) -> bool {
        matches!(
            self,
            Operation::GetList | Operation::GetOne | Operation::GetMany
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ProviderError;

    /// Accepts current names (`getList`) and the legacy constants (`GET_LIST`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "getList" | "GET_LIST" => Operation::GetList,
            "getOne" | "GET_ONE" => Operation::GetOne,
            "getMany" | "GET_MANY" => Operation::GetMany,
            "getManyReference" | "GET_MANY_REFERENCE" => Operation::GetManyReference,
            "create" | "CREATE" => Operation::Create,
            "update" | "UPDATE" => Operation::Update,
            "updateMany" | "UPDATE_MANY" => Operation::UpdateMany,
            "delete" | "DELETE" => Operation::Delete,
            "deleteMany" | "DELETE_MANY" => Operation::DeleteMany,
            other => return Err(ProviderError::UnsupportedType(other.to_string())),
        };
        Ok(op)
    }
}
