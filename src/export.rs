//! Delimited-text export of logged meals, water and mood
//!
//! `All` writes a metadata block followed by one marked section per
//! non-empty record kind. Single-kind exports are just a header row plus
//! data rows. Nothing is produced when the range holds no rows for the
//! requested kinds.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::db::Store;
use crate::models::{MealLogEntry, MoodLogEntry, WaterLogEntry};

const MEAL_HEADER: [&str; 8] = [
  "Date",
  "Time",
  "Meal Name",
  "Meal Type",
  "Calories",
  "Protein (g)",
  "Carbs (g)",
  "Fat (g)",
];
const WATER_HEADER: [&str; 2] = ["Date/Time", "Amount (ml)"];
const MOOD_HEADER: [&str; 3] = ["Date/Time", "Rating (1-10)", "Notes"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Export buffer error: {0}")]
  Buffer(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
  All,
  MealsOnly,
  WaterOnly,
  MoodOnly,
}

impl ExportKind {
  pub fn label(&self) -> &'static str {
    match self {
      ExportKind::All => "All Data",
      ExportKind::MealsOnly => "Meal Logs Only",
      ExportKind::WaterOnly => "Water Intake Only",
      ExportKind::MoodOnly => "Mood Logs Only",
    }
  }

  fn includes_meals(&self) -> bool {
    matches!(self, ExportKind::All | ExportKind::MealsOnly)
  }

  fn includes_water(&self) -> bool {
    matches!(self, ExportKind::All | ExportKind::WaterOnly)
  }

  fn includes_mood(&self) -> bool {
    matches!(self, ExportKind::All | ExportKind::MoodOnly)
  }
}

impl fmt::Display for ExportKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for ExportKind {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim().to_lowercase();
    if s.starts_with("all") {
      Ok(ExportKind::All)
    } else if s.starts_with("meal") {
      Ok(ExportKind::MealsOnly)
    } else if s.starts_with("water") {
      Ok(ExportKind::WaterOnly)
    } else if s.starts_with("mood") {
      Ok(ExportKind::MoodOnly)
    } else {
      Err(format!("Unknown export kind: {}", s))
    }
  }
}

/// ---------------------------------------------------------------------------
/// Export
/// ---------------------------------------------------------------------------

/// Fetch the requested record kinds for `start..=end` and render them.
///
/// The reads are independent, so a storage failure partway through yields
/// a report built from whatever was read.
pub async fn export_to_delimited_text(
  store: &Store,
  start: NaiveDate,
  end: NaiveDate,
  kind: ExportKind,
) -> Option<String> {
  let meals = if kind.includes_meals() {
    store.get_meals_in_range(start, end).await
  } else {
    Vec::new()
  };
  let water = if kind.includes_water() {
    store.get_water_in_range(start, end).await
  } else {
    Vec::new()
  };
  let mood = if kind.includes_mood() {
    store.get_mood_in_range(start, end).await
  } else {
    Vec::new()
  };

  tracing::debug!(
    %kind,
    meals = meals.len(),
    water = water.len(),
    mood = mood.len(),
    "Exporting logs"
  );

  render_export(
    &meals,
    &water,
    &mood,
    start,
    end,
    kind,
    Local::now().naive_local(),
  )
}

/// Render already-fetched records. Kinds not selected by `kind` are ignored.
pub fn render_export(
  meals: &[MealLogEntry],
  water: &[WaterLogEntry],
  mood: &[MoodLogEntry],
  start: NaiveDate,
  end: NaiveDate,
  kind: ExportKind,
  exported_at: NaiveDateTime,
) -> Option<String> {
  let meals: &[MealLogEntry] = if kind.includes_meals() { meals } else { &[] };
  let water: &[WaterLogEntry] = if kind.includes_water() { water } else { &[] };
  let mood: &[MoodLogEntry] = if kind.includes_mood() { mood } else { &[] };

  if meals.is_empty() && water.is_empty() && mood.is_empty() {
    return None;
  }

  match write_document(meals, water, mood, start, end, kind, exported_at) {
    Ok(text) => Some(text),
    Err(e) => {
      tracing::error!(error = %e, %kind, "Failed to render export");
      None
    }
  }
}

fn write_document(
  meals: &[MealLogEntry],
  water: &[WaterLogEntry],
  mood: &[MoodLogEntry],
  start: NaiveDate,
  end: NaiveDate,
  kind: ExportKind,
  exported_at: NaiveDateTime,
) -> Result<String, ExportError> {
  let mut buf = Vec::new();

  match kind {
    ExportKind::All => {
      write_section(&mut buf, |writer| {
        writer.write_record([
          "Export Date".to_string(),
          exported_at.format("%Y-%m-%d %H:%M").to_string(),
        ])?;
        writer.write_record(["Data Period".to_string(), format!("{} to {}", start, end)])?;
        Ok(())
      })?;

      // Each section is preceded by one empty line
      if !meals.is_empty() {
        buf.push(b'\n');
        write_section(&mut buf, |writer| {
          writer.write_record(["=== MEAL LOGS ==="])?;
          write_meals(writer, meals)
        })?;
      }
      if !water.is_empty() {
        buf.push(b'\n');
        write_section(&mut buf, |writer| {
          writer.write_record(["=== WATER INTAKE LOGS ==="])?;
          write_water(writer, water)
        })?;
      }
      if !mood.is_empty() {
        buf.push(b'\n');
        write_section(&mut buf, |writer| {
          writer.write_record(["=== MOOD LOGS ==="])?;
          write_mood(writer, mood)
        })?;
      }
    }
    ExportKind::MealsOnly => write_section(&mut buf, |writer| write_meals(writer, meals))?,
    ExportKind::WaterOnly => write_section(&mut buf, |writer| write_water(writer, water))?,
    ExportKind::MoodOnly => write_section(&mut buf, |writer| write_mood(writer, mood))?,
  }

  String::from_utf8(buf).map_err(|e| ExportError::Buffer(e.to_string()))
}

/// Run `write` against a fresh writer appending to `buf`, then flush it
fn write_section<F>(buf: &mut Vec<u8>, write: F) -> Result<(), ExportError>
where
  F: FnOnce(&mut csv::Writer<&mut Vec<u8>>) -> Result<(), ExportError>,
{
  let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(buf);
  write(&mut writer)?;
  writer.flush()?;
  Ok(())
}

fn write_meals<W: Write>(writer: &mut csv::Writer<W>, meals: &[MealLogEntry]) -> Result<(), ExportError> {
  writer.write_record(MEAL_HEADER)?;
  for meal in meals {
    writer.write_record([
      meal.date.to_string(),
      meal.time.clone(),
      meal.meal_name.clone(),
      meal.meal_type.to_string(),
      meal.calories.to_string(),
      meal.protein.to_string(),
      meal.carbs.to_string(),
      meal.fat.to_string(),
    ])?;
  }
  Ok(())
}

fn write_water<W: Write>(writer: &mut csv::Writer<W>, water: &[WaterLogEntry]) -> Result<(), ExportError> {
  writer.write_record(WATER_HEADER)?;
  for entry in water {
    writer.write_record([
      entry.logged_at.format(TIMESTAMP_FORMAT).to_string(),
      entry.amount_ml.to_string(),
    ])?;
  }
  Ok(())
}

fn write_mood<W: Write>(writer: &mut csv::Writer<W>, mood: &[MoodLogEntry]) -> Result<(), ExportError> {
  writer.write_record(MOOD_HEADER)?;
  for entry in mood {
    writer.write_record([
      entry.logged_at.format(TIMESTAMP_FORMAT).to_string(),
      entry.rating.to_string(),
      entry.notes.clone(),
    ])?;
  }
  Ok(())
}
