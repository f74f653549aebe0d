//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod repository_provider;
pub mod service_offering_repository;
pub mod user_repository;
pub mod vehicle_repository;
pub mod work_order_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, DbErr, EntityTrait, IdenStatic, Order, QueryFilter, Select};

use crate::domain::query::{FilterValue, SortDirection};
use crate::domain::DomainError;

// ── Shared query helpers ────────────────────────────────────────

pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

pub(crate) fn is_unique_violation(e: &DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate key")
}

/// Equality or `IN` on an allow-listed column.
pub(crate) fn filter_by<E: EntityTrait>(
    query: Select<E>,
    column: E::Column,
    value: &FilterValue,
) -> Select<E> {
    match value {
        FilterValue::Eq(v) => query.filter(column.eq(v.as_str())),
        FilterValue::In(vs) => query.filter(column.is_in(vs.iter().map(String::as_str))),
    }
}

/// Like [`filter_by`] for integer columns; non-numeric values are a validation error.
pub(crate) fn filter_by_int<E: EntityTrait>(
    query: Select<E>,
    column: E::Column,
    value: &FilterValue,
) -> Result<Select<E>, DomainError> {
    let parse = |v: &str| {
        v.trim().parse::<i32>().map_err(|_| {
            DomainError::Validation(format!("filter {} expects a number, got {}", column.as_str(), v))
        })
    };
    Ok(match value {
        FilterValue::Eq(v) => query.filter(column.eq(parse(v)?)),
        FilterValue::In(vs) => {
            let numbers = vs.iter().map(|v| parse(v)).collect::<Result<Vec<_>, _>>()?;
            query.filter(column.is_in(numbers))
        }
    })
}

const LIKE_ESCAPE: char = '\\';

/// `LOWER(col) LIKE '%term%'` over any of `columns`; `%` and `_` in `term`
/// match themselves.
pub(crate) fn search_any<C: ColumnTrait>(columns: &[C], term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    columns.iter().fold(Condition::any(), |cond, column| {
        cond.add(
            Expr::expr(Func::lower(Expr::col(*column)))
                .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
        )
    })
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

pub(crate) fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("brake"), "brake");
        assert_eq!(escape_like("100%_off"), "100\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
