// Section variant renderers: one section, several presentational layouts,
// chosen by a string key stored in the template configuration.

pub mod handlers;
pub mod projects;
