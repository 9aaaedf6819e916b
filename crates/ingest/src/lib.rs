pub mod error;
pub mod frequency;
pub mod reader;
pub mod record;

pub use error::{IngestError, Result};
pub use frequency::{build_frequency_table, count_file, FrequencyTable};
pub use reader::{parse_line, RecordReader};
pub use record::{EntityAnnotation, RawRecord};
