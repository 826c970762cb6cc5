// src/descriptor.rs
//
// Static descriptions of the type a mock stands in for.
// Registrations are validated against these descriptors instead of
// runtime introspection, which Rust does not have.

use thiserror::Error;

/// Configuration errors raised when a mock is scripted incorrectly.
/// These abort the current test step; response lookups never raise them.
#[derive(Debug, Error)]
pub enum MockError {
    /// The method being scripted is not declared by the reference type.
    #[error("method `{method}` not found on `{reference}` when adding a mock response")]
    MethodNotFound { method: String, reference: String },

    /// The mock declares neither a mocked type nor any trait contract,
    /// so there is nothing to validate the method against.
    #[error(
        "`{mock}` must stand in for a type or implement a trait that defines `{method}` \
         before mock responses can be added"
    )]
    NoMockedType { mock: String, method: String },
}

/// A single method signature: its name and parameter names in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    params: Vec<String>,
}

impl MethodDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
        }
    }

    pub fn with_params(name: &str, params: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Parameter name at `index`, if the signature declares one.
    pub fn param_name(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

/// The declared surface of a real type: its name and methods.
#[derive(Debug, Clone, Default)]
pub struct TypeDescriptor {
    name: String,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            methods: Vec::new(),
        }
    }

    /// Declare a method with no named parameters.
    pub fn method(mut self, name: &str) -> Self {
        self.methods.push(MethodDescriptor::new(name));
        self
    }

    /// Declare a method with named parameters, in call order.
    pub fn method_with_params(mut self, name: &str, params: &[&str]) -> Self {
        self.methods.push(MethodDescriptor::with_params(name, params));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// What a mock declares about itself: its own type name, at most one
/// concrete type it stands in for, and the trait contracts it implements.
///
/// Mirrors how a mock class either extends the real type or implements
/// one of its interfaces; scripting a method that neither declares is a
/// programming error and fails fast.
#[derive(Debug, Clone)]
pub struct MockTarget {
    name: String,
    mocked: Option<TypeDescriptor>,
    contracts: Vec<TypeDescriptor>,
}

impl MockTarget {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mocked: None,
            contracts: Vec::new(),
        }
    }

    /// Declare the concrete type this mock stands in for.
    pub fn for_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.mocked = Some(descriptor);
        self
    }

    /// Declare a trait contract this mock implements.
    pub fn implementing(mut self, descriptor: TypeDescriptor) -> Self {
        self.contracts.push(descriptor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used when reporting on the mocked method: the mocked type if
    /// declared, otherwise the mock's own name.
    pub fn reference_name(&self) -> &str {
        self.mocked.as_ref().map(|d| d.name()).unwrap_or(&self.name)
    }

    /// Validate that `method` exists on the mocked type, or failing that,
    /// on one of the declared trait contracts.
    pub fn check_method(&self, method: &str) -> Result<(), MockError> {
        let mut reference = self.mocked.as_ref();

        // A mock may implement a trait instead of standing in for a type.
        if reference.is_none() {
            if self.contracts.is_empty() {
                return Err(MockError::NoMockedType {
                    mock: self.name.clone(),
                    method: method.to_string(),
                });
            }
            reference = self.contracts.iter().find(|c| c.has_method(method));
        }

        match reference {
            Some(descriptor) if descriptor.has_method(method) => Ok(()),
            Some(descriptor) => Err(MockError::MethodNotFound {
                method: method.to_string(),
                reference: descriptor.name().to_string(),
            }),
            // No contract declared the method; report against the mock itself.
            None => Err(MockError::MethodNotFound {
                method: method.to_string(),
                reference: self.name.clone(),
            }),
        }
    }

    /// Find the signature for `method`, scanning the mocked type first and
    /// the trait contracts after.
    pub fn find_method(&self, method: &str) -> Option<&MethodDescriptor> {
        self.mocked
            .as_ref()
            .and_then(|d| d.find_method(method))
            .or_else(|| self.contracts.iter().find_map(|c| c.find_method(method)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_target() -> MockTarget {
        MockTarget::new("MockCatalog")
            .for_type(
                TypeDescriptor::new("Catalog")
                    .method("refresh")
                    .method_with_params("lookup", &["id"]),
            )
    }

    #[test]
    fn test_check_method_on_mocked_type() {
        let target = catalog_target();
        assert!(target.check_method("refresh").is_ok());
        assert!(target.check_method("lookup").is_ok());
    }

    #[test]
    fn test_check_method_missing_names_mocked_type() {
        let target = catalog_target();
        let err = target.check_method("purge").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("purge"));
        assert!(message.contains("Catalog"));
        assert!(matches!(err, MockError::MethodNotFound { .. }));
    }

    #[test]
    fn test_check_method_via_contract() {
        let target = MockTarget::new("MockStore")
            .implementing(TypeDescriptor::new("Storage").method_with_params("fetch", &["key"]));
        assert!(target.check_method("fetch").is_ok());
    }

    #[test]
    fn test_check_method_missing_from_contracts_names_mock() {
        let target = MockTarget::new("MockStore")
            .implementing(TypeDescriptor::new("Storage").method("fetch"));
        let err = target.check_method("destroy").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("destroy"));
        assert!(message.contains("MockStore"));
        assert!(matches!(err, MockError::MethodNotFound { .. }));
    }

    #[test]
    fn test_check_method_without_type_or_contract() {
        let target = MockTarget::new("MockNothing");
        let err = target.check_method("test").unwrap_err();
        assert!(matches!(err, MockError::NoMockedType { .. }));
        assert!(err.to_string().contains("MockNothing"));
    }

    #[test]
    fn test_find_method_prefers_mocked_type() {
        let target = MockTarget::new("MockCatalog")
            .for_type(TypeDescriptor::new("Catalog").method_with_params("lookup", &["id"]))
            .implementing(TypeDescriptor::new("Storage").method_with_params("lookup", &["key"]));

        let descriptor = target.find_method("lookup").unwrap();
        assert_eq!(descriptor.param_name(0), Some("id"));
    }

    #[test]
    fn test_param_name_out_of_range() {
        let descriptor = MethodDescriptor::with_params("lookup", &["id"]);
        assert_eq!(descriptor.param_name(0), Some("id"));
        assert_eq!(descriptor.param_name(1), None);
    }

    #[test]
    fn test_reference_name_falls_back_to_mock_name() {
        let target = MockTarget::new("MockBare");
        assert_eq!(target.reference_name(), "MockBare");

        let target = catalog_target();
        assert_eq!(target.reference_name(), "Catalog");
    }
}
