use crate::api::{
    client::{ExperimentService, ResourceFilter},
    error::Error,
    experiment::Experiment,
    list::{ListOptions, ListResponse},
};

/// Walks a list call page by page.
///
/// Starts from the token in the initial options (none or empty means the
/// beginning), feeds every returned token back, and stops after the page
/// carrying an empty token. An error is yielded once and ends the walk.
pub struct Pages<T, F>
where
    F: FnMut(&ListOptions) -> Result<ListResponse<T>, Error>,
{
    list: F,
    options: ListOptions,
    done: bool,
}

impl<T, F> Pages<T, F>
where
    F: FnMut(&ListOptions) -> Result<ListResponse<T>, Error>,
{
    pub fn new(options: ListOptions, list: F) -> Self {
        Pages {
            list,
            options,
            done: false,
        }
    }

    /// Collects the items of every remaining page.
    pub fn collect_items(self) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        for page in self {
            items.extend(page?.items);
        }
        Ok(items)
    }
}

impl<T, F> Iterator for Pages<T, F>
where
    F: FnMut(&ListOptions) -> Result<ListResponse<T>, Error>,
{
    type Item = Result<ListResponse<T>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match (self.list)(&self.options) {
            Ok(page) => {
                if page.is_last_page() {
                    self.done = true;
                } else {
                    self.options.page_token = Some(page.next_page_token.clone());
                }
                Some(Ok(page))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Pages of experiments, optionally restricted to one resource.
pub fn experiment_pages<'a, S>(
    service: &'a S,
    options: ListOptions,
    resource: Option<&'a ResourceFilter>,
) -> Pages<Experiment, impl FnMut(&ListOptions) -> Result<ListResponse<Experiment>, Error> + 'a>
where
    S: ExperimentService + ?Sized,
{
    Pages::new(options, move |options| service.list_experiments(options, resource))
}
