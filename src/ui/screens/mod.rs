pub mod form;
pub mod results;

pub use form::FormScreen;
pub use results::ResultsScreen;
