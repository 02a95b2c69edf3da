use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::config::resolve_data_dir;
use crate::model::{ActivityLabel, LabelRegistry};
use crate::repository::traits::LabelRepository;

const LABELS_FILE_NAME: &str = "labels.json";

#[derive(Clone)]
pub struct FileLabelRepository {
    file_path: PathBuf,
}

impl FileLabelRepository {
    /// Seeds the default labels when no labels file exists yet.
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = resolve_data_dir(base_dir)?;
        fs::create_dir_all(&path)?;
        path.push(LABELS_FILE_NAME);

        let repo = FileLabelRepository { file_path: path };
        if !repo.file_path.exists() {
            info!("creating default labels at {}", repo.file_path.display());
            repo.save_labels(&LabelRegistry::with_defaults())?;
        }
        Ok(repo)
    }
}

impl LabelRepository for FileLabelRepository {
    fn get_labels(&self) -> Result<LabelRegistry> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let map: BTreeMap<String, ActivityLabel> = serde_json::from_reader(reader)
            .with_context(|| format!("Could not parse {}", self.file_path.display()))?;
        Ok(LabelRegistry::from_map(map))
    }

    fn save_labels(&self, labels: &LabelRegistry) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &labels.to_map())?;
        writer.flush()?;
        Ok(())
    }
}
