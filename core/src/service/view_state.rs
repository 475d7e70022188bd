pub const LOADING_MESSAGE: &str = "در حال بارگذاری...";

/// What a view shows between loads: a spinner text, the rendered content,
/// or the inline failure message that replaces it.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(content) => Some(content),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// Text to show instead of content, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ViewState::Loading => Some(LOADING_MESSAGE),
            ViewState::Ready(_) => None,
            ViewState::Failed(message) => Some(message),
        }
    }
}
