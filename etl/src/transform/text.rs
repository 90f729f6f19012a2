//! Text normalizer: strip surrounding whitespace, then title case.

use super::steps::{CleaningStep, StepOutcome};
use crate::models::{Cell, Table};

/// Title case: a cased character following an uncased one is uppercased,
/// every other cased character is lowercased.
///
/// Word boundaries are any non-cased character, so `o'neil` becomes
/// `O'Neil` and `abc123def` becomes `Abc123Def`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;

    for c in s.chars() {
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased && !prev_cased {
            out.extend(c.to_uppercase());
        } else if cased {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }

    out
}

/// Strip then title case a single value. Non-text cells pass through.
pub fn normalize_cell(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => Cell::Text(title_case(s.trim())),
        other => other.clone(),
    }
}

/// Normalize every listed column. Callers pass only columns that exist;
/// unknown names are ignored.
pub fn normalize_text(table: &mut Table, columns: &[String]) -> StepOutcome {
    let mut outcome = StepOutcome::new(CleaningStep::NormalizeText);

    for name in columns {
        let Some(col) = table.column_mut(name) else {
            continue;
        };
        for cell in col.cells.iter_mut() {
            let normalized = normalize_cell(cell);
            if normalized != *cell {
                outcome.changed += 1;
                *cell = normalized;
            }
        }
        outcome.columns.push(name.clone());
    }

    outcome.applied = !outcome.columns.is_empty();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    #[test]
    fn test_strip_and_title() {
        assert_eq!(normalize_cell(&Cell::text("  north  ")), Cell::text("North"));
        assert_eq!(normalize_cell(&Cell::text("SOUTH EAST")), Cell::text("South East"));
    }

    #[test]
    fn test_title_case_word_boundaries() {
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("north-east"), "North-East");
        assert_eq!(title_case("abc123def"), "Abc123Def");
        assert_eq!(title_case("mCdonald's  burgers"), "Mcdonald'S  Burgers");
        assert_eq!(title_case("élan vital"), "Élan Vital");
    }

    #[test]
    fn test_non_text_untouched() {
        assert_eq!(normalize_cell(&Cell::Number(5.0)), Cell::Number(5.0));
        assert_eq!(normalize_cell(&Cell::Missing), Cell::Missing);
    }

    #[test]
    fn test_whitespace_only_becomes_empty_text() {
        assert_eq!(normalize_cell(&Cell::text("   ")), Cell::Text(String::new()));
    }

    #[test]
    fn test_normalize_text_skips_absent_columns() {
        let mut table = Table::from_columns(vec![
            Column::new("Region", vec![Cell::text("  north  "), Cell::text("SOUTH EAST")]),
            Column::new("Notes", vec![Cell::text("  keep me  "), Cell::Missing]),
        ])
        .unwrap();

        let columns = vec!["Product Name".to_string(), "Region".to_string()];
        let outcome = normalize_text(&mut table, &columns);

        assert!(outcome.applied);
        assert_eq!(outcome.columns, vec!["Region"]);
        assert_eq!(outcome.changed, 2);
        assert_eq!(table.cell(0, "Region"), Some(&Cell::text("North")));
        assert_eq!(table.cell(1, "Region"), Some(&Cell::text("South East")));
        assert_eq!(table.cell(0, "Notes"), Some(&Cell::text("  keep me  ")));
    }

    #[test]
    fn test_already_clean_counts_nothing() {
        let mut table =
            Table::from_columns(vec![Column::new("Region", vec![Cell::text("North")])]).unwrap();
        let outcome = normalize_text(&mut table, &["Region".to_string()]);
        assert!(outcome.applied);
        assert_eq!(outcome.changed, 0);
    }
}
