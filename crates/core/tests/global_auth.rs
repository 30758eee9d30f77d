use std::sync::Arc;

use wisby_core::CoreError;
use wisby_core::auth::AuthConfig;
use wisby_core::global::{get_auth, setup_auth};
use wisby_core::store::memory::MemoryStore;

#[test]
fn test_auth_setup_is_idempotent() {
    assert!(matches!(get_auth(), Err(CoreError::Uninitialized("auth"))));

    let store = Arc::new(MemoryStore::new());
    let first = setup_auth(
        AuthConfig::new(store.clone(), "first-secret").with_base_url("http://localhost:4000"),
    )
    .unwrap();
    let second = setup_auth(AuthConfig::new(store, "second-secret")).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.base_url(), Some("http://localhost:4000"));
    assert!(Arc::ptr_eq(&first, &get_auth().unwrap()));
}
