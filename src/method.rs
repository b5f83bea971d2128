use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Lifecycle and wrapper operations of the data source surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DataSourceMethod {
    /// Open the underlying connection.
    Initialize,

    /// Close the underlying connection.
    Destroy,

    /// Drop every table of the database.
    DropDatabase,

    /// Apply pending migrations.
    RunMigrations,

    /// List pending migrations.
    ShowMigrations,

    /// Synchronize the schema with the entity metadata.
    Synchronize,

    /// Revert the last applied migration.
    UndoLastMigration,

    /// Run a unit of work inside a transaction.
    Transaction,
}

/// Lifecycle operations of the query runner surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum QueryRunnerMethod {
    /// Acquire the runner's connection.
    Connect,

    /// Open a transaction on the runner's connection.
    StartTransaction,

    /// Commit the open transaction.
    CommitTransaction,

    /// Roll back the open transaction.
    RollbackTransaction,

    /// Release the runner's connection.
    Release,
}

/// Operations of the query builder surface.
///
/// Chainable operations return the builder itself; terminal operations end
/// the chain and fetch data (see [QueryBuilderMethod::is_terminal]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
#[allow(missing_docs)]
pub enum QueryBuilderMethod {
    Select,
    Where,
    AndWhere,
    OrWhere,
    InnerJoin,
    LeftJoin,
    InnerJoinAndSelect,
    LeftJoinAndSelect,
    GroupBy,
    Having,
    OrderBy,
    Skip,
    Take,
    Limit,
    Offset,
    GetOne,
    GetMany,
    GetManyAndCount,
    GetCount,
    GetRawOne,
    GetRawMany,
    Execute,
}

impl QueryBuilderMethod {
    /// Whether the operation ends the chain and fetches data.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::GetOne
                | Self::GetMany
                | Self::GetManyAndCount
                | Self::GetCount
                | Self::GetRawOne
                | Self::GetRawMany
                | Self::Execute
        )
    }
}

/// Data operations of the entity manager and repository surfaces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
#[allow(missing_docs)]
pub enum ManagerMethod {
    Find,
    FindBy,
    FindOne,
    FindOneBy,
    FindAndCount,
    Count,
    Exists,
    Save,
    Insert,
    Update,
    Delete,
    SoftDelete,
    Restore,
    Transaction,
}

/// Operation identifier across every stubbed surface.
///
/// The interceptable set is closed: each surface declares a fixed operation
/// enum and this union tags which surface an operation belongs to. Stub
/// registrations are keyed by entity type and [SurfaceMethod].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceMethod {
    /// A data source operation.
    DataSource(DataSourceMethod),

    /// A query runner operation.
    QueryRunner(QueryRunnerMethod),

    /// A query builder operation.
    QueryBuilder(QueryBuilderMethod),

    /// An entity manager or repository operation.
    Manager(ManagerMethod),
}

impl fmt::Display for SurfaceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataSource(method) => write!(f, "dataSource.{method}"),
            Self::QueryRunner(method) => write!(f, "queryRunner.{method}"),
            Self::QueryBuilder(method) => write!(f, "queryBuilder.{method}"),
            Self::Manager(method) => write!(f, "manager.{method}"),
        }
    }
}

impl From<DataSourceMethod> for SurfaceMethod {
    fn from(method: DataSourceMethod) -> Self {
        Self::DataSource(method)
    }
}

impl From<QueryRunnerMethod> for SurfaceMethod {
    fn from(method: QueryRunnerMethod) -> Self {
        Self::QueryRunner(method)
    }
}

impl From<QueryBuilderMethod> for SurfaceMethod {
    fn from(method: QueryBuilderMethod) -> Self {
        Self::QueryBuilder(method)
    }
}

impl From<ManagerMethod> for SurfaceMethod {
    fn from(method: ManagerMethod) -> Self {
        Self::Manager(method)
    }
}

/// Transaction isolation level accepted by the transaction wrappers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum IsolationLevel {
    /// Dirty reads allowed.
    #[strum(serialize = "READ UNCOMMITTED")]
    #[serde(rename = "READ UNCOMMITTED")]
    ReadUncommitted,

    /// Only committed data is visible.
    #[strum(serialize = "READ COMMITTED")]
    #[serde(rename = "READ COMMITTED")]
    ReadCommitted,

    /// Repeated reads within the transaction are stable.
    #[strum(serialize = "REPEATABLE READ")]
    #[serde(rename = "REPEATABLE READ")]
    RepeatableRead,

    /// Full serializable isolation.
    #[strum(serialize = "SERIALIZABLE")]
    #[serde(rename = "SERIALIZABLE")]
    Serializable,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn methods_display_in_camel_case() {
        assert_eq!("initialize", DataSourceMethod::Initialize.to_string());
        assert_eq!(
            "undoLastMigration",
            DataSourceMethod::UndoLastMigration.to_string()
        );
        assert_eq!(
            "startTransaction",
            QueryRunnerMethod::StartTransaction.to_string()
        );
        assert_eq!("getOne", QueryBuilderMethod::GetOne.to_string());
        assert_eq!("where", QueryBuilderMethod::Where.to_string());
        assert_eq!("findOneBy", ManagerMethod::FindOneBy.to_string());
    }

    #[test]
    fn surface_method_display_is_prefixed_with_the_surface() {
        assert_eq!(
            "dataSource.runMigrations",
            SurfaceMethod::from(DataSourceMethod::RunMigrations).to_string()
        );
        assert_eq!(
            "queryRunner.release",
            SurfaceMethod::from(QueryRunnerMethod::Release).to_string()
        );
        assert_eq!(
            "queryBuilder.getMany",
            SurfaceMethod::from(QueryBuilderMethod::GetMany).to_string()
        );
        assert_eq!(
            "manager.findOne",
            SurfaceMethod::from(ManagerMethod::FindOne).to_string()
        );
    }

    #[test]
    fn query_builder_terminal_methods_are_exactly_the_data_fetching_ones() {
        let terminals: Vec<_> = QueryBuilderMethod::iter().filter(|m| m.is_terminal()).collect();

        assert_eq!(
            vec![
                QueryBuilderMethod::GetOne,
                QueryBuilderMethod::GetMany,
                QueryBuilderMethod::GetManyAndCount,
                QueryBuilderMethod::GetCount,
                QueryBuilderMethod::GetRawOne,
                QueryBuilderMethod::GetRawMany,
                QueryBuilderMethod::Execute,
            ],
            terminals
        );
    }

    #[test]
    fn isolation_levels_display_as_sql_keywords() {
        assert_eq!(
            "READ UNCOMMITTED",
            IsolationLevel::ReadUncommitted.to_string()
        );
        assert_eq!("READ COMMITTED", IsolationLevel::ReadCommitted.to_string());
        assert_eq!("REPEATABLE READ", IsolationLevel::RepeatableRead.to_string());
        assert_eq!("SERIALIZABLE", IsolationLevel::Serializable.to_string());
    }
}
