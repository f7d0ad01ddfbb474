use crate::entities::dataset::CombinedDataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    /// Target table did not exist and was created from the dataset.
    Created { rows: usize },
    /// Target table was already present; nothing was written.
    AlreadyExists,
    /// Target was (over)written in full.
    Written { rows: usize },
}

pub trait DatasetSink {
    fn write_dataset(&self, dataset: &CombinedDataset) -> Result<SinkOutcome, String>;
}
