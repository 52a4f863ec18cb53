use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx, XlsxError};
use thiserror::Error;

use crate::RankingRow;

/// The only value of the top-tier column that counts as "in the top tier".
pub const TOP_TIER_MARK: &str = "✅";

const POSITION: &str = "Posición";
const PLAYER: &str = "Jugador";
const POINTS: &str = "Puntos";
const MEMBER_SINCE: &str = "PDC desde";
const TOP_TIER: &str = "Top 64";

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("failed to open ranking workbook")]
    Workbook(#[source] XlsxError),
    #[error("ranking workbook has no worksheets")]
    NoSheet,
    #[error("failed to read the first ranking worksheet")]
    Sheet(#[source] XlsxError),
}

/// Parses the first worksheet of an `.xlsx` document into ranking rows.
pub fn parse_ranking<B: AsRef<[u8]>>(bytes: B) -> Result<Vec<RankingRow>, RankingError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes.as_ref())).map_err(RankingError::Workbook)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(RankingError::NoSheet)?
        .map_err(RankingError::Sheet)?;

    Ok(rows_from_range(&range))
}

fn cell_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Maps a worksheet to rows keyed by its header row. Blank rows are skipped,
/// everything else is kept in sheet order. Text fields are trimmed, the
/// top-tier cell is compared as stored.
pub fn rows_from_range(range: &Range<Data>) -> Vec<RankingRow> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    let column = |name: &str| {
        header
            .iter()
            .position(|cell| cell_text(Some(cell)).as_deref() == Some(name))
    };

    let position = column(POSITION);
    let player = column(PLAYER);
    let points = column(POINTS);
    let member_since = column(MEMBER_SINCE);
    let top_tier = column(TOP_TIER);

    let field = |row: &[Data], idx: Option<usize>| cell_text(idx.and_then(|idx| row.get(idx)));

    rows.filter(|row| row.iter().any(|cell| cell_text(Some(cell)).is_some()))
        .map(|row| RankingRow {
            position: field(row, position),
            player: field(row, player),
            points: field(row, points),
            member_since: field(row, member_since),
            top_tier: matches!(
                top_tier.and_then(|idx| row.get(idx)),
                Some(Data::String(mark)) if mark == TOP_TIER_MARK
            ),
        })
        .collect()
}
