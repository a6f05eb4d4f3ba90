//! Integration test: process-wide registry installation.
//!
//! Kept in its own test binary so no other test observes the installed
//! registry.

use cfgres_core::ConnectorId;
use cfgres_schema::{catalog, registry, RegistryError, SchemaRegistry};

#[test]
fn test_install_once_then_read_only() {
    assert_eq!(registry::global().unwrap_err(), RegistryError::NotInstalled);

    let mut builder = SchemaRegistry::builder();
    builder
        .register_all(catalog::builtin_schemas().unwrap())
        .unwrap();
    let installed = builder.build().install().unwrap();
    assert_eq!(installed.len(), catalog::builtin_ids().count());

    let again = SchemaRegistry::default().install();
    assert_eq!(again.unwrap_err(), RegistryError::AlreadyInstalled);

    // The lazy initializer never runs once a registry is installed.
    let lazy = registry::get_or_init(|| panic!("initializer must not run"));
    let id = ConnectorId::new("staging-upload").unwrap();
    assert!(lazy.get(&id).is_some());
    assert!(std::ptr::eq(lazy, registry::global().unwrap()));
}
