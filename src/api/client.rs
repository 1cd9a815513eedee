use crate::api::{
    contributor::Binding,
    error::Error,
    experiment::{Experiment, ResourceType},
    id::ExperimentId,
    list::{ListOptions, ListResponse},
};

/// Restricts a list call to what one resource references, e.g. the
/// experiments of a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFilter {
    pub resource_type: ResourceType,
    pub id: String,
}

impl ResourceFilter {
    pub fn namespace(namespace: impl Into<String>) -> Self {
        ResourceFilter {
            resource_type: ResourceType::Namespace,
            id: namespace.into(),
        }
    }
}

/// Optional narrowing of a binding listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingQuery {
    pub namespace: Option<String>,
    pub user: Option<String>,
    pub role: Option<String>,
}

impl BindingQuery {
    pub fn namespace(namespace: impl Into<String>) -> Self {
        BindingQuery {
            namespace: Some(namespace.into()),
            ..BindingQuery::default()
        }
    }
}

#[rustfmt::skip]
pub trait ExperimentService {
    fn create_experiment(&self, experiment: &Experiment) -> Result<Experiment, Error>;
    fn get_experiment(&self, id: &ExperimentId) -> Result<Experiment, Error>;
    fn list_experiments(&self, options: &ListOptions, resource: Option<&ResourceFilter>) -> Result<ListResponse<Experiment>, Error>;
    fn delete_experiment(&self, id: &ExperimentId) -> Result<(), Error>;
}

#[rustfmt::skip]
pub trait ContributorService {
    fn list_bindings(&self, query: &BindingQuery) -> Result<Vec<Binding>, Error>;
    fn add_contributor(&self, binding: &Binding) -> Result<(), Error>;
    fn remove_contributor(&self, binding: &Binding) -> Result<(), Error>;

    /// Bindings of `namespace` without the owner's own binding.
    fn list_contributors(&self, namespace: &str) -> Result<Vec<Binding>, Error> {
        let bindings = self.list_bindings(&BindingQuery::namespace(namespace))?;
        Ok(bindings.into_iter().filter(|b| !b.is_owner()).collect())
    }
}
