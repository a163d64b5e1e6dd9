pub mod image_batch;
pub mod label_batch;
pub mod tensor_data;
pub mod tensor_desc;
pub mod value_range;

pub use image_batch::ImageBatch;
pub use label_batch::LabelBatch;
pub use tensor_data::{BatchData, SourceFormat};
pub use tensor_desc::TensorDesc;
pub use value_range::ValueRange;
