pub mod events;
pub mod inspector;
pub mod navigator;
pub mod refresh;
pub mod view_state;

#[cfg(test)]
mod test_support;
