//! Inter-annotator agreement statistic.
//!
//! Implements a generalized Fleiss' kappa over a [`RatingsTable`]: one
//! row per rated subject, one column per category, each cell counting
//! how many annotators chose that category for that subject. Subjects
//! that were not rated by every annotator are tolerated via an implicit
//! "not rated" category (see [`fleiss_kappa`]).

// ---------------------------------------------------------------------------
// Ratings table
// ---------------------------------------------------------------------------

/// A subjects-by-categories count matrix for one agreement computation.
///
/// Rebuilt from live annotation data on every recomputation; never
/// persisted or cached across calls. Column order is fixed at
/// construction; row order is the order subjects were pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingsTable {
    num_categories: usize,
    rows: Vec<Vec<u32>>,
}

impl RatingsTable {
    /// Create an empty table with `num_categories` category columns.
    pub fn new(num_categories: usize) -> Self {
        Self {
            num_categories,
            rows: Vec::new(),
        }
    }

    /// Append a subject row initialized to zero for every category,
    /// returning its row index.
    pub fn push_subject(&mut self) -> usize {
        self.rows.push(vec![0; self.num_categories]);
        self.rows.len() - 1
    }

    /// Record one annotator's choice of the category at column `category`
    /// for the subject at row `subject`.
    pub fn record(&mut self, subject: usize, category: usize) {
        self.rows[subject][category] += 1;
    }

    /// Number of subject rows.
    pub fn num_subjects(&self) -> usize {
        self.rows.len()
    }

    /// Total count across all cells.
    pub fn total_ratings(&self) -> u64 {
        self.rows.iter().flatten().map(|&c| u64::from(c)).sum()
    }

    fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }
}

// ---------------------------------------------------------------------------
// Fleiss' kappa
// ---------------------------------------------------------------------------

/// Number of raters below which agreement is undefined. Callers assign
/// the default score for such inputs instead of calling [`fleiss_kappa`].
pub const MIN_RATERS: u32 = 2;

/// Generalized Fleiss' kappa over `table`, expecting `raters` distinct
/// annotators per subject.
///
/// When the table accounts for fewer than `raters * num_subjects`
/// ratings, an implicit "not rated" category is prepended holding each
/// row's shortfall, so documents with partial coverage still produce a
/// score.
///
/// Returns 1.0 when chance agreement `p_e` reaches 1: with every rating
/// in a single category there is no variability to disagree over, and
/// the kappa denominator would be zero. The result is typically within
/// [-1, 1] but is not clamped; pathological inputs can fall below -1.
pub fn fleiss_kappa(table: &RatingsTable, raters: u32) -> f64 {
    debug_assert!(raters >= MIN_RATERS, "callers handle the <2-rater case");

    let subjects = table.num_subjects();
    if subjects == 0 {
        // Nothing was rated, so there is nothing to disagree over.
        return 1.0;
    }

    let n = f64::from(raters);

    // Expand to an f64 matrix, prepending the implicit "not rated"
    // column when the table does not account for every expected rating.
    let fully_rated = table.total_ratings() == u64::from(raters) * subjects as u64;
    let matrix: Vec<Vec<f64>> = table
        .rows()
        .iter()
        .map(|row| {
            let mut cells: Vec<f64> = row.iter().map(|&c| f64::from(c)).collect();
            if !fully_rated {
                let rated: f64 = cells.iter().sum();
                cells.insert(0, n - rated);
            }
            cells
        })
        .collect();

    let num_categories = matrix[0].len();
    let total_expected = subjects as f64 * n;

    // Per-category proportion of all ratings (p_j).
    let p_j: Vec<f64> = (0..num_categories)
        .map(|col| matrix.iter().map(|row| row[col]).sum::<f64>() / total_expected)
        .collect();

    // Per-subject observed agreement (p_i), averaged into p_o.
    let p_o = matrix
        .iter()
        .map(|row| {
            let sum_sq: f64 = row.iter().map(|c| c * c).sum();
            (sum_sq - n) / (n * (n - 1.0))
        })
        .sum::<f64>()
        / subjects as f64;

    // Chance agreement (p_e).
    let p_e: f64 = p_j.iter().map(|p| p * p).sum();

    if (p_e - 1.0).abs() < f64::EPSILON {
        return 1.0;
    }

    (p_o - p_e) / (1.0 - p_e)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table_from(rows: &[&[u32]], num_categories: usize) -> RatingsTable {
        let mut table = RatingsTable::new(num_categories);
        for row in rows {
            let subject = table.push_subject();
            for (category, &count) in row.iter().enumerate() {
                for _ in 0..count {
                    table.record(subject, category);
                }
            }
        }
        table
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    // -- degenerate cases --------------------------------------------------

    #[test]
    fn unanimous_single_category_returns_one() {
        // Three subjects, one category, three raters each: p_e == 1.
        let table = table_from(&[&[3], &[3], &[3]], 1);
        assert_close(fleiss_kappa(&table, 3), 1.0);
    }

    #[test]
    fn empty_table_returns_one() {
        let table = RatingsTable::new(2);
        assert_close(fleiss_kappa(&table, 2), 1.0);
    }

    // -- exact formula values ----------------------------------------------

    #[test]
    fn full_disagreement_two_raters_is_minus_one() {
        // One subject, two categories, each chosen once: p_o = 0,
        // p_e = 0.5, kappa = -1.
        let table = table_from(&[&[1, 1]], 2);
        assert_close(fleiss_kappa(&table, 2), -1.0);
    }

    #[test]
    fn partial_agreement_two_raters() {
        // Rows [2,0], [2,0], [1,1]: p_o = 2/3, p_e = 13/18, kappa = -0.2.
        let table = table_from(&[&[2, 0], &[2, 0], &[1, 1]], 2);
        assert_close(fleiss_kappa(&table, 2), -0.2);
    }

    #[test]
    fn partial_agreement_three_raters() {
        // Rows [3,0], [1,2]: p_o = 2/3, p_e = 5/9, kappa = 0.25.
        let table = table_from(&[&[3, 0], &[1, 2]], 3);
        assert_close(fleiss_kappa(&table, 3), 0.25);
    }

    // -- implicit "not rated" column ---------------------------------------

    #[test]
    fn missing_ratings_pad_an_implicit_category() {
        // Two raters expected, but the second subject was rated once.
        // Padded rows become [0,2] and [1,1]: p_o = 1/2, p_e = 5/8,
        // kappa = -1/3.
        let table = table_from(&[&[2], &[1]], 1);
        assert_close(fleiss_kappa(&table, 2), -1.0 / 3.0);
    }

    #[test]
    fn implicit_pad_matches_explicit_category() {
        // The padded table must score the same as one where the missing
        // ratings are written out as an explicit extra category.
        let padded = table_from(&[&[2], &[1]], 1);
        let explicit = table_from(&[&[2, 0], &[1, 1]], 2);
        assert_close(fleiss_kappa(&padded, 2), fleiss_kappa(&explicit, 2));
    }

    // -- table plumbing ----------------------------------------------------

    #[test]
    fn push_subject_returns_sequential_indices() {
        let mut table = RatingsTable::new(1);
        assert_eq!(table.push_subject(), 0);
        assert_eq!(table.push_subject(), 1);
        assert_eq!(table.num_subjects(), 2);
    }

    #[test]
    fn total_ratings_sums_all_cells() {
        let table = table_from(&[&[2, 1], &[0, 3]], 2);
        assert_eq!(table.total_ratings(), 6);
    }
}
