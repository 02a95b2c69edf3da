use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;

use crate::config::resolve_data_dir;
use crate::model::DayRecord;
use crate::repository::traits::HistoryRepository;

const HISTORY_FILE_NAME: &str = "days.json";

#[derive(Clone)]
pub struct FileHistoryRepository {
    file_path: PathBuf,
}

impl FileHistoryRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = resolve_data_dir(base_dir)?;
        fs::create_dir_all(&path)?;
        path.push(HISTORY_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<DayRecord>::new())?;
            writer.flush()?;
        }

        Ok(FileHistoryRepository { file_path: path })
    }

    fn read_days(&self) -> Result<Vec<DayRecord>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let days: Vec<DayRecord> = serde_json::from_reader(reader)
            .with_context(|| format!("Could not parse {}", self.file_path.display()))?;
        Ok(days)
    }

    fn write_days(&self, days: &[DayRecord]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, days)?;
        writer.flush()?;
        Ok(())
    }
}

impl HistoryRepository for FileHistoryRepository {
    fn get_days(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayRecord>> {
        let days: Vec<DayRecord> = self
            .read_days()?
            .into_iter()
            .filter(|d| start <= d.date && d.date <= end)
            .collect();
        debug!("loaded {} recorded days for {}..={}", days.len(), start, end);
        Ok(days)
    }

    fn get(&self, date: NaiveDate) -> Result<Option<DayRecord>> {
        let days = self.read_days()?;
        Ok(days.into_iter().find(|d| d.date == date))
    }

    fn upsert(&self, day: DayRecord) -> Result<()> {
        let mut days = self.read_days()?;
        if let Some(pos) = days.iter().position(|d| d.date == day.date) {
            days[pos] = day;
        } else {
            days.push(day);
        }
        days.sort_by_key(|d| d.date);
        self.write_days(&days)
    }
}
