use snafu::Snafu;

/// The error type returned when a list-shaped API response does not narrow down to a single
/// item.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum SingleResultError {
    #[snafu(display("Expected one result, found none"))]
    Empty,

    #[snafu(display("Expected one result, found {}", count))]
    Multiple { count: usize },
}

/// Narrows a list response to exactly one item. Lookups that identify a resource by a unique
/// key should see exactly one match; zero means the resource is gone and more than one means
/// the key was not unique after all.
pub fn single_result<T>(items: Vec<T>) -> Result<T, SingleResultError> {
    let count = items.len();
    let mut items = items.into_iter();
    match (items.next(), items.next()) {
        (Some(item), None) => Ok(item),
        (None, _) => Err(SingleResultError::Empty),
        (Some(_), Some(_)) => Err(SingleResultError::Multiple { count }),
    }
}

/// Narrows a list response to at most one item, treating an empty response as `None` rather
/// than an error.
pub fn optional_single_result<T>(items: Vec<T>) -> Result<Option<T>, SingleResultError> {
    match single_result(items) {
        Ok(item) => Ok(Some(item)),
        Err(SingleResultError::Empty) => Ok(None),
        Err(error) => Err(error),
    }
}
