use serde_json::json;

use orm_double::test_tools::{TestLogger, exclusive_session};
use orm_double::{ManagerMethod, MockOrm, MockOrmError, SessionState};

struct Role;

#[tokio::test]
async fn surfaces_fail_once_the_session_is_restored() {
    let _slot = exclusive_session();
    let (orm, teardown) = MockOrm::install(TestLogger::stdout()).unwrap();
    let data_source = orm.data_source();
    let runner = data_source.create_query_runner();
    let mut builder = data_source.create_query_builder::<Role>("role");
    teardown.restore();

    assert_eq!(SessionState::Restored, orm.state());
    for error in [
        data_source.initialize().await.unwrap_err(),
        runner.connect().await.unwrap_err(),
        builder.where_clause("role.id = 1").get_one().await.unwrap_err(),
        data_source.manager().find_one::<Role>(json!({})).await.unwrap_err(),
    ] {
        assert!(
            matches!(
                error.downcast_ref::<MockOrmError>(),
                Some(MockOrmError::SessionRestored)
            ),
            "unexpected error: {error}"
        );
    }
}

#[tokio::test]
async fn a_new_session_starts_without_the_previous_registrations() {
    let _slot = exclusive_session();
    {
        let (orm, teardown) = MockOrm::install(TestLogger::stdout()).unwrap();
        orm.on_mock::<Role>().to_return(json!({"id": "1"}), ManagerMethod::FindOne);

        assert_eq!(
            json!({"id": "1"}),
            orm.data_source().manager().find_one::<Role>(json!({})).await.unwrap()
        );
        teardown.restore();
    }

    let (orm, _teardown) = MockOrm::install(TestLogger::stdout()).unwrap();

    assert_eq!(
        json!({}),
        orm.data_source().manager().find_one::<Role>(json!({})).await.unwrap()
    );
}

#[tokio::test]
async fn dropping_the_teardown_handle_restores_implicitly() {
    let _slot = exclusive_session();
    let orm = {
        let (orm, _teardown) = MockOrm::install(TestLogger::stdout()).unwrap();
        orm
        // _teardown dropped here
    };

    assert_eq!(SessionState::Restored, orm.state());
    let (_orm, _teardown) = MockOrm::install(TestLogger::stdout()).unwrap();
}

#[tokio::test]
async fn only_one_session_is_active_at_a_time() {
    let _slot = exclusive_session();
    let (_orm, _teardown) = MockOrm::install(TestLogger::stdout()).unwrap();

    let error = MockOrm::install(TestLogger::stdout()).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<MockOrmError>(),
        Some(MockOrmError::SessionAlreadyActive)
    ));
}

#[tokio::test]
async fn registering_an_operation_never_resolved_by_a_surface_is_inert() {
    let _slot = exclusive_session();
    let (orm, _teardown) = MockOrm::install(TestLogger::stdout()).unwrap();
    // The runner lifecycle is not registry-resolved: the registration below
    // must not change its observable behavior.
    orm.on_mock::<Role>().to_return(json!("ignored"), orm_double::QueryRunnerMethod::Connect);

    let runner = orm.data_source().create_query_runner();
    runner.connect().await.unwrap();

    assert_eq!(1, runner.calls().count(orm_double::QueryRunnerMethod::Connect));
}
