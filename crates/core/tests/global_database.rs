use std::sync::Arc;

use wisby_core::CoreError;
use wisby_core::database::DatabaseKind;
use wisby_core::global::{get_database, init_database};

#[test]
fn test_database_is_initialized_once() {
    assert!(matches!(get_database(), Err(CoreError::Uninitialized("database"))));

    let first = init_database("postgresql://u:p@ep-one.neon.tech/db", DatabaseKind::Neon).unwrap();
    let second = init_database(
        "postgresql://u:p@ep-two.neon.tech/other",
        DatabaseKind::Neon,
    )
    .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        second.connection_string(),
        "postgresql://u:p@ep-one.neon.tech/db"
    );

    let fetched = get_database().unwrap();
    assert!(Arc::ptr_eq(&first, &fetched));
    assert_eq!(fetched.kind(), DatabaseKind::Neon);
}
