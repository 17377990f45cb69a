mod folders;
mod loader;
mod types;

pub use folders::{build_folder_tree, flatten, FolderNode};
pub use loader::load_dashboard;
pub use types::{Dashboard, DeploymentInstance, PipelineInstance};
