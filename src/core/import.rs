//! Turn delimited text, spreadsheet and word-processing files into a new
//! program block.
//!
//! `.xlsx` and `.docx` are zip archives of XML parts; only the pieces that
//! carry cell values and paragraph text are read.

use super::session::Session;
use crate::errors::{AppError, AppResult};
use crate::models::program::next_order_index;
use crate::models::{Action, Grid, Program};
use crate::store::{RecordStore, RecordStoreExt};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;
use zip::ZipArchive;

/// Header cell of a grid built from a document.
pub const DOCUMENT_HEADER: &str = "Imported from DOCX";

static SHARED_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<si(?:\s[^>]*?)?>(.*?)</si>").expect("valid regex"));
static TEXT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<t(?:\s[^>]*?)?>(.*?)</t>").expect("valid regex"));
static SHEET_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<row(?:\s([^>]*?))?(?:/>|>(.*?)</row>)").expect("valid regex")
});
static SHEET_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<c(?:\s([^>]*?))?(?:/>|>(.*?)</c>)").expect("valid regex")
});
static CELL_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<v>(.*?)</v>").expect("valid regex"));
static WORKBOOK_SHEET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<sheet\s[^>]*?r:id="([^"]*)""#).expect("valid regex")
});
static RELATIONSHIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Relationship\s([^>]*?)/?>").expect("valid regex"));
static DOC_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*?)?(?:/>|>(.*?)</w:p>)").expect("valid regex")
});
static DOC_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*?)?>(.*?)</w:t>|<w:tab/>|<w:br/>").expect("valid regex")
});
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid regex"));

/// Supported input files, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Csv,
    Text,
    Spreadsheet,
    Document,
}

impl ImportKind {
    pub fn detect(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(ImportKind::Csv),
            "txt" => Ok(ImportKind::Text),
            "xlsx" => Ok(ImportKind::Spreadsheet),
            "docx" => Ok(ImportKind::Document),
            _ => Err(AppError::UnsupportedImport(path.display().to_string())),
        }
    }
}

/// What an import produced.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub program: Program,
    /// Created on the backend right away (as opposed to waiting for a save).
    pub saved: bool,
}

/// Read `path` into a grid. Ragged rows are padded; nothing at all gives a
/// single blank cell under a blank header.
pub fn read_grid(path: &Path) -> AppResult<Grid> {
    let rows = match ImportKind::detect(path)? {
        ImportKind::Csv => read_csv(path)?,
        ImportKind::Text => parse_text(&fs::read_to_string(path)?),
        ImportKind::Spreadsheet => read_xlsx(path)?,
        ImportKind::Document => {
            let text = read_docx(path)?;
            vec![vec![DOCUMENT_HEADER.to_string()], vec![text]]
        }
    };
    Ok(Grid::from_rows(rows))
}

pub fn read_csv(path: &Path) -> AppResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// One row per line, one cell per comma.
pub fn parse_text(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect()
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> AppResult<Option<String>> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

fn unescape_xml(s: &str) -> String {
    let s = NUMERIC_ENTITY.replace_all(s, |caps: &regex::Captures| {
        let raw = &caps[1];
        let code = match raw.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    let start = attrs
        .match_indices(&needle)
        .find(|(i, _)| *i == 0 || attrs.as_bytes()[i - 1].is_ascii_whitespace())
        .map(|(i, _)| i + needle.len())?;
    let len = attrs[start..].find('"')?;
    Some(&attrs[start..start + len])
}

/// Concatenated text runs of one `<si>` or `<is>` element.
fn run_text(xml: &str) -> String {
    TEXT_RUN
        .captures_iter(xml)
        .map(|c| unescape_xml(&c[1]))
        .collect()
}

/// Largest sheet a spreadsheet application will write.
const MAX_SHEET_ROWS: usize = 1_048_576;
const MAX_SHEET_COLUMNS: usize = 16_384;

/// `"BC12"` → column 54 (zero-based). `None` when the reference has no letters.
fn column_index(reference: &str) -> AppResult<Option<usize>> {
    let letters: String = reference
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return Ok(None);
    }
    let out_of_range = || AppError::Import(format!("cell reference {reference} is out of range"));
    let mut acc = 0usize;
    for c in letters.chars() {
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        acc = acc
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .filter(|n| *n <= MAX_SHEET_COLUMNS)
            .ok_or_else(out_of_range)?;
    }
    Ok(Some(acc - 1))
}

/// Path of the worksheet part listed first in the workbook, falling back to
/// the lowest-numbered `sheetN.xml`.
fn first_sheet(archive: &mut ZipArchive<File>) -> AppResult<String> {
    if let (Some(workbook), Some(rels)) = (
        read_part(archive, "xl/workbook.xml")?,
        read_part(archive, "xl/_rels/workbook.xml.rels")?,
    ) && let Some(rel_id) = WORKBOOK_SHEET.captures(&workbook).map(|c| c[1].to_string())
    {
        for rel in RELATIONSHIP.captures_iter(&rels) {
            let attrs = &rel[1];
            if attribute(attrs, "Id") == Some(rel_id.as_str())
                && let Some(target) = attribute(attrs, "Target")
            {
                let target = target.trim_start_matches('/');
                let name = if target.starts_with("xl/") {
                    target.to_string()
                } else {
                    format!("xl/{target}")
                };
                if archive.file_names().any(|n| n == name) {
                    return Ok(name);
                }
            }
        }
    }

    archive
        .file_names()
        .filter_map(|n| {
            let number = n
                .strip_prefix("xl/worksheets/sheet")?
                .strip_suffix(".xml")?
                .parse::<u32>()
                .ok()?;
            Some((number, n.to_string()))
        })
        .min()
        .map(|(_, name)| name)
        .ok_or_else(|| AppError::Import("workbook has no worksheet".into()))
}

/// First worksheet of an `.xlsx` workbook, as text cells.
pub fn read_xlsx(path: &Path) -> AppResult<Vec<Vec<String>>> {
    let mut archive = ZipArchive::new(File::open(path)?)?;

    let shared: Vec<String> = read_part(&mut archive, "xl/sharedStrings.xml")?
        .map(|xml| {
            SHARED_STRING
                .captures_iter(&xml)
                .map(|c| run_text(&c[1]))
                .collect()
        })
        .unwrap_or_default();

    let sheet_name = first_sheet(&mut archive)?;
    let sheet = read_part(&mut archive, &sheet_name)?
        .ok_or_else(|| AppError::Import(format!("missing {sheet_name}")))?;

    let mut rows: BTreeMap<usize, BTreeMap<usize, String>> = BTreeMap::new();
    let mut next_row = 0;

    for row in SHEET_ROW.captures_iter(&sheet) {
        let attrs = row.get(1).map_or("", |m| m.as_str());
        let row_idx = attribute(attrs, "r")
            .and_then(|r| r.parse::<usize>().ok())
            .map_or(next_row, |r| r.saturating_sub(1));
        if row_idx >= MAX_SHEET_ROWS {
            return Err(AppError::Import(format!("row {} is out of range", row_idx + 1)));
        }
        next_row = row_idx + 1;

        let cells = rows.entry(row_idx).or_default();
        let body = row.get(2).map_or("", |m| m.as_str());
        let mut next_col = 0;

        for cell in SHEET_CELL.captures_iter(body) {
            let attrs = cell.get(1).map_or("", |m| m.as_str());
            let inner = cell.get(2).map_or("", |m| m.as_str());
            let col = match attribute(attrs, "r") {
                Some(r) => column_index(r)?.unwrap_or(next_col),
                None => next_col,
            };
            if col >= MAX_SHEET_COLUMNS {
                return Err(AppError::Import("too many columns in worksheet".into()));
            }
            next_col = col + 1;

            let raw = CELL_VALUE
                .captures(inner)
                .map(|c| unescape_xml(&c[1]))
                .unwrap_or_default();
            let text = match attribute(attrs, "t") {
                Some("s") => raw
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| shared.get(i).cloned())
                    .unwrap_or_default(),
                Some("inlineStr") => run_text(inner),
                _ => raw,
            };
            cells.insert(col, text);
        }
    }

    let Some(&last_row) = rows.keys().next_back() else {
        return Ok(Vec::new());
    };
    let mut out = vec![Vec::new(); last_row + 1];
    for (r, cells) in rows {
        let width = cells.keys().next_back().map_or(0, |c| c + 1);
        let mut line = vec![String::new(); width];
        for (c, text) in cells {
            line[c] = text;
        }
        out[r] = line;
    }
    Ok(out)
}

/// Paragraph text of a `.docx` document, one line per paragraph.
pub fn read_docx(path: &Path) -> AppResult<String> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let xml = read_part(&mut archive, "word/document.xml")?
        .ok_or_else(|| AppError::Import("missing word/document.xml".into()))?;

    let paragraphs: Vec<String> = DOC_PARAGRAPH
        .captures_iter(&xml)
        .map(|p| {
            let body = p.get(1).map_or("", |m| m.as_str());
            DOC_RUN
                .captures_iter(body)
                .map(|run| match run.get(1) {
                    Some(text) => unescape_xml(text.as_str()),
                    None if &run[0] == "<w:tab/>" => "\t".to_string(),
                    None => "\n".to_string(),
                })
                .collect()
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Import `path` as a new block of the current trainee.
///
/// For a saved trainee the block is created on the backend immediately;
/// for a trainee that only exists locally it waits for the next save.
pub fn import_into(
    store: &mut dyn RecordStore,
    session: &mut Session,
    path: &Path,
) -> AppResult<ImportOutcome> {
    let trainee = session.current_trainee().ok_or(AppError::NoTrainee)?.clone();
    let grid = read_grid(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let title = format!("Imported: {name}");

    if trainee.id.is_temporary() {
        let program = session
            .add_program_with(&title, grid, Action::ImportFile, &name)?
            .clone();
        return Ok(ImportOutcome {
            program,
            saved: false,
        });
    }

    let draft = Program::draft(trainee.id, &title, grid, next_order_index(&session.programs));
    let program = store.create_program(draft)?;
    tracing::info!(id = %program.id, file = %name, "imported program");
    session.push_saved_program(program.clone(), Action::ImportFile, &name);
    Ok(ImportOutcome {
        program,
        saved: true,
    })
}
