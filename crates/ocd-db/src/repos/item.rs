//! Subject item repository: creation, kanban transitions, completion queries.

use chrono::{DateTime, Utc};

use ocd_core::audit_detail::StatusChangedDetail;
use ocd_core::entities::Item;
use ocd_core::enums::{AuditAction, EntityType, ItemStatus, Priority, Swimlane, TrailOp};
use ocd_core::errors::CoreError;
use ocd_core::ids::PREFIX_ITEM;
use ocd_core::responses::ItemMoveResponse;
use ocd_core::trail::TrailOperation;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_json_column, parse_optional_datetime,
    to_json_text, to_json_value,
};
use crate::service::OcdService;
use crate::tracker::OutcomeEvent;

const SELECT_COLS: &str = "id, user_id, title, status, swimlane, priority, labels, cycle_count, \
     total_time_in_create, started_at, completed_at, blocked_at, status_changed_at, created_at, updated_at";

fn row_to_item(row: &libsql::Row) -> Result<Item, DatabaseError> {
    Ok(Item {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        swimlane: get_opt_string(row, 4)?.as_deref().map(parse_enum).transpose()?,
        priority: get_opt_string(row, 5)?.as_deref().map(parse_enum).transpose()?,
        labels: parse_json_column("labels", &row.get::<String>(6)?)?,
        cycle_count: get_u32(row, 7)?,
        total_time_in_create: get_u32(row, 8)?,
        started_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
        completed_at: parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
        blocked_at: parse_optional_datetime(get_opt_string(row, 11)?.as_deref())?,
        status_changed_at: parse_optional_datetime(get_opt_string(row, 12)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(13)?)?,
        updated_at: parse_datetime(&row.get::<String>(14)?)?,
    })
}

fn get_u32(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u32::try_from(raw)
        .map_err(|_| DatabaseError::InvalidState(format!("column {idx} out of range: {raw}")))
}

fn opt_ts(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.to_rfc3339())
}

/// Input for [`OcdService::create_item`].
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub user_id: String,
    pub title: String,
    /// Starting column; `INBOX` when unset. Terminal columns are rejected.
    pub status: Option<ItemStatus>,
    pub swimlane: Option<Swimlane>,
    pub priority: Option<Priority>,
    pub labels: Vec<String>,
}

/// Result of a status change. `event` is set when the item reached a
/// terminal column and its decisions are due for outcome evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTransition {
    pub item: Item,
    pub event: Option<OutcomeEvent>,
}

impl OcdService {
    pub async fn create_item(&self, new: NewItem) -> Result<Item, DatabaseError> {
        if new.user_id.trim().is_empty() {
            return Err(CoreError::Validation("item user_id must not be empty".into()).into());
        }
        if new.title.trim().is_empty() {
            return Err(CoreError::Validation("item title must not be empty".into()).into());
        }
        let status = new.status.unwrap_or(ItemStatus::Inbox);
        if status.is_terminal() || status == ItemStatus::Archive {
            return Err(CoreError::Validation(format!(
                "items cannot be created in {status}"
            ))
            .into());
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ITEM).await?;
        let item = Item {
            id: id.clone(),
            user_id: new.user_id,
            title: new.title,
            status,
            swimlane: new.swimlane,
            priority: new.priority,
            labels: new.labels,
            cycle_count: 0,
            total_time_in_create: 0,
            started_at: (status == ItemStatus::Doing).then_some(now),
            completed_at: None,
            blocked_at: (status == ItemStatus::Blocked).then_some(now),
            status_changed_at: Some(now),
            created_at: now,
            updated_at: now,
        };

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO items ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
                ),
                libsql::params![
                    item.id.as_str(),
                    item.user_id.as_str(),
                    item.title.as_str(),
                    item.status.as_str(),
                    item.swimlane.map(Swimlane::as_str),
                    item.priority.map(Priority::as_str),
                    to_json_text(&item.labels)?,
                    item.cycle_count,
                    item.total_time_in_create,
                    opt_ts(item.started_at),
                    opt_ts(item.completed_at),
                    opt_ts(item.blocked_at),
                    opt_ts(item.status_changed_at),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.audit(&item.user_id, EntityType::Item, &id, AuditAction::Created, None)
            .await?;

        self.trail().append_validated(&TrailOperation {
            v: 1,
            ts: now.to_rfc3339(),
            actor: item.user_id.clone(),
            op: TrailOp::Create,
            entity: EntityType::Item,
            id,
            data: to_json_value(&item)?,
        })?;

        Ok(item)
    }

    pub async fn get_item(&self, id: &str) -> Result<Item, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM items WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_item(&row)
    }

    /// Like [`Self::get_item`], but a missing item is `Ok(None)`.
    pub async fn find_item(&self, id: &str) -> Result<Option<Item>, DatabaseError> {
        match self.get_item(id).await {
            Ok(item) => Ok(Some(item)),
            Err(DatabaseError::NoResult) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Move an item to another column, applying the kanban bookkeeping
    /// (time in DOING, rework cycles, first-entry timestamps).
    ///
    /// Does not run the outcome tracker; the returned event is for the caller
    /// to hand over. See [`Self::move_item`] for the all-in-one path.
    ///
    /// # Errors
    ///
    /// `DatabaseError::Core(CoreError::InvalidTransition)` when the move is not
    /// allowed, `DatabaseError::NoResult` when the item does not exist.
    pub async fn transition_item(
        &self,
        id: &str,
        next: ItemStatus,
    ) -> Result<ItemTransition, DatabaseError> {
        let current = self.get_item(id).await?;
        let mut item = current.clone();
        let now = Utc::now();
        item.apply_transition(next, now)?;

        self.db()
            .conn()
            .execute(
                "UPDATE items SET status = ?1, cycle_count = ?2, total_time_in_create = ?3,
                     started_at = ?4, completed_at = ?5, blocked_at = ?6,
                     status_changed_at = ?7, updated_at = ?8
                 WHERE id = ?9",
                libsql::params![
                    item.status.as_str(),
                    item.cycle_count,
                    item.total_time_in_create,
                    opt_ts(item.started_at),
                    opt_ts(item.completed_at),
                    opt_ts(item.blocked_at),
                    opt_ts(item.status_changed_at),
                    now.to_rfc3339(),
                    id
                ],
            )
            .await?;

        let detail = to_json_value(&StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: next.as_str().to_string(),
            reason: None,
        })?;

        self.audit(
            &item.user_id,
            EntityType::Item,
            id,
            AuditAction::StatusChanged,
            Some(detail.clone()),
        )
        .await?;

        self.trail().append(&TrailOperation {
            v: 1,
            ts: now.to_rfc3339(),
            actor: item.user_id.clone(),
            op: TrailOp::Transition,
            entity: EntityType::Item,
            id: id.to_string(),
            data: detail,
        })?;

        let event = next.is_terminal().then(|| OutcomeEvent::ItemTerminal {
            item_id: id.to_string(),
            status: next,
            at: now,
        });
        Ok(ItemTransition { item, event })
    }

    /// Transition an item and, if it became terminal, run the outcome
    /// tracker for it in place.
    pub async fn move_item(
        &self,
        id: &str,
        next: ItemStatus,
    ) -> Result<ItemMoveResponse, DatabaseError> {
        let ItemTransition { item, event } = self.transition_item(id, next).await?;
        let tracker = match &event {
            Some(event) => Some(self.handle_outcome_event(event).await?),
            None => None,
        };
        Ok(ItemMoveResponse {
            item,
            terminal: event.is_some(),
            tracker,
        })
    }

    /// Label sets of the user's items completed (`DONE`, or archived after
    /// `DONE`) at or after `since`.
    pub async fn completions_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Vec<String>>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT labels FROM items
                 WHERE user_id = ?1 AND status IN ('DONE', 'ARCHIVE') AND completed_at >= ?2",
                libsql::params![user_id, since.to_rfc3339()],
            )
            .await?;

        let mut sets = Vec::new();
        while let Some(row) = rows.next().await? {
            sets.push(parse_json_column("labels", &row.get::<String>(0)?)?);
        }
        Ok(sets)
    }

    /// IDs of every decision that references the item, oldest first.
    pub async fn decision_ids_for_item(&self, item_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id FROM decisions WHERE item_id = ?1 ORDER BY created_at, id",
                [item_id],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }
}
