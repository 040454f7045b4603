mod discovery;
mod population;

pub use discovery::{
    dir_name, is_image_file, list_eligible_files, list_subdirectories, IMAGE_EXTENSIONS,
};
pub use population::{DatasetSplit, FilePopulation, Layout};
