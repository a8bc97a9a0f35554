pub mod add;
pub mod list;
pub mod open;
pub mod scan;

pub use add::AddCommand;
pub use list::ListCommand;
pub use open::OpenCommand;
pub use scan::ScanCommand;
