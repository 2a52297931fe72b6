use serde_json::{json, Value};
use tracing::{info, warn};

use super::{MutationError, Resource, ResourcePage};
use crate::api::{ApiClient, ApiRequest};
use crate::forms::EducationLevelForm;
use crate::models::EducationLevel;
use crate::output::Record;

impl Resource for EducationLevel {
    type Form = EducationLevelForm;

    const ENDPOINT: &'static str = "education_levels.php";
    const LIST_KEYS: &'static [&'static str] = &["levels", "education_levels"];
    const NOUN: &'static str = "education level";

    fn id(&self) -> i64 {
        self.id
    }

    fn status_toggle(&self) -> Value {
        json!({ "is_active": !self.is_active })
    }

    fn sort(rows: &mut [Self]) {
        rows.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

impl Record for EducationLevel {
    const COLUMNS: &'static [&'static str] = &[
        "Order",
        "ID",
        "Name",
        "Code",
        "Active",
        "Description",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.display_order.to_string(),
            self.id.to_string(),
            self.name.clone(),
            self.code.clone(),
            if self.is_active { "yes" } else { "no" }.to_string(),
            self.description.clone(),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// First row moved up or last row moved down; nothing was sent.
    Unchanged,
    Swapped { moved: i64, with: i64 },
}

pub fn can_move_up(index: usize) -> bool {
    index > 0
}

pub fn can_move_down(index: usize, len: usize) -> bool {
    index + 1 < len
}

/// New `(id, display_order)` pairs for swapping `rows[a]` and `rows[b]`.
/// Equal orders (left behind by older non-atomic swaps) are separated so
/// the swap always changes the sort position.
pub fn swap_orders(rows: &[EducationLevel], a: usize, b: usize) -> [(i64, i64); 2] {
    let (first, second) = (&rows[a], &rows[b]);
    if first.display_order == second.display_order {
        let low = first.display_order;
        let (above, below) = if a < b { (first, second) } else { (second, first) };
        return [(below.id, low), (above.id, low + 1)];
    }
    [
        (first.id, second.display_order),
        (second.id, first.display_order),
    ]
}

pub type EducationLevelsPage = ResourcePage<EducationLevel>;

impl ResourcePage<EducationLevel> {
    pub fn education_levels(client: ApiClient) -> Self {
        Self::new(client)
    }

    /// Swaps a row with its neighbour in one batched request, then
    /// refetches. Indexes refer to the current display order.
    pub async fn move_row(
        &self,
        index: usize,
        direction: Direction,
    ) -> Result<ReorderOutcome, MutationError> {
        let rows = self.rows().await;
        let neighbour = match direction {
            Direction::Up if can_move_up(index) && index < rows.len() => index - 1,
            Direction::Down if can_move_down(index, rows.len()) => index + 1,
            _ => return Ok(ReorderOutcome::Unchanged),
        };

        let orders = swap_orders(&rows, index, neighbour);
        let body = json!({
            "orders": orders
                .iter()
                .map(|(id, order)| json!({ "id": id, "display_order": order }))
                .collect::<Vec<_>>(),
        });
        let request = ApiRequest::put(EducationLevel::ENDPOINT, body).action(Some("swap_order"));
        if let Err(e) = self.client().send(request).await {
            warn!(error = %e, "reorder rejected");
            self.refresh().await;
            return Err(e.into());
        }

        let outcome = ReorderOutcome::Swapped {
            moved: rows[index].id,
            with: rows[neighbour].id,
        };
        info!(?outcome, "education levels reordered");
        self.refresh().await;
        Ok(outcome)
    }

    pub async fn move_up(&self, index: usize) -> Result<ReorderOutcome, MutationError> {
        self.move_row(index, Direction::Up).await
    }

    pub async fn move_down(&self, index: usize) -> Result<ReorderOutcome, MutationError> {
        self.move_row(index, Direction::Down).await
    }

    /// Index in display order of the level with `id`.
    pub async fn position_of(&self, id: i64) -> Option<usize> {
        self.rows().await.iter().position(|l| l.id == id)
    }
}
