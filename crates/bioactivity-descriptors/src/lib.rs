//! bioactivity-descriptors: everything between the uploaded file and the
//! model's feature matrix:
//! 1. Parsing the whitespace-delimited upload into input records
//! 2. Writing the tab-separated intermediate file
//! 3. Running PaDEL-Descriptor as an external process
//! 4. Reading the descriptor CSV
//! 5. Projecting it onto the reference feature list

pub mod input;
pub mod padel;
pub mod table;
pub mod align;

pub use align::{FeatureMatrix, ReferenceFeatureList};
pub use padel::{DescriptorTool, PadelRunner};
pub use table::DescriptorTable;
