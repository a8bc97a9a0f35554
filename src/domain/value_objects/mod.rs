pub mod git_url;
pub mod project_name;
