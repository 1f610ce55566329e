// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Permission records and the operation → required-permission table.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::models::data_types::Operation;

/// What a permission record protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Database,
    Table,
    System,
}

/// One grant: operation × object type × object name. An empty name is a
/// wildcard over every object of that type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub operation: Operation,
    pub object_type: ObjectType,
    pub object_name: String,
}

impl Permission {
    pub fn new(
        operation: Operation,
        object_type: ObjectType,
        object_name: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            object_type,
            object_name: object_name.into(),
        }
    }

    /// Wildcard grant over every object of `object_type`.
    pub fn any(operation: Operation, object_type: ObjectType) -> Self {
        Self::new(operation, object_type, "")
    }

    pub fn allows(
        &self,
        operation: Operation,
        object_type: ObjectType,
        object_name: &str,
    ) -> bool {
        self.operation == operation
            && self.object_type == object_type
            && (self.object_name.is_empty() || self.object_name == object_name)
    }
}

/// Permission a request must hold, keyed by its operation.
///
/// USE_DATABASE is deliberately gated on SELECT over the database: selecting
/// a database only reads it.
pub fn required_permission(operation: Operation) -> (Operation, ObjectType) {
    match operation {
        Operation::CreateDatabase => (Operation::CreateDatabase, ObjectType::Database),
        Operation::DropDatabase => (Operation::DropDatabase, ObjectType::Database),
        Operation::UseDatabase => (Operation::Select, ObjectType::Database),
        Operation::CreateTable => (Operation::CreateTable, ObjectType::Table),
        Operation::DropTable => (Operation::DropTable, ObjectType::Table),
        Operation::Insert => (Operation::Insert, ObjectType::Table),
        Operation::Select => (Operation::Select, ObjectType::Table),
        Operation::Update => (Operation::Update, ObjectType::Table),
        Operation::Delete => (Operation::Delete, ObjectType::Table),
    }
}

/// The full grant set held by `admin`: every operation, wildcard, over
/// databases, tables and the system itself.
pub static FULL_PERMISSIONS: Lazy<Vec<Permission>> = Lazy::new(|| {
    let operations = [
        Operation::CreateDatabase,
        Operation::DropDatabase,
        Operation::UseDatabase,
        Operation::CreateTable,
        Operation::DropTable,
        Operation::Insert,
        Operation::Select,
        Operation::Update,
        Operation::Delete,
    ];
    let mut grants = Vec::new();
    for op in operations {
        for object_type in [ObjectType::Database, ObjectType::Table, ObjectType::System] {
            grants.push(Permission::any(op, object_type));
        }
    }
    grants
});
