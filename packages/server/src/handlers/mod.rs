pub mod auth;
pub mod coffee;
pub mod docs;
pub mod review;
pub mod roastery;
pub mod shop;
pub mod stats;
pub mod user;

use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Alias, Func, LikeExpr};
use sea_orm::*;

use crate::models::shared::escape_like;

/// Case-insensitive substring match of `expr` against `needle`.
/// Returns `None` for a blank or absent needle.
pub(crate) fn contains_ci(expr: Expr, needle: Option<&str>) -> Option<Expr> {
    let term = match needle.map(str::trim) {
        Some(t) if !t.is_empty() => escape_like(t).to_lowercase(),
        _ => return None,
    };

    Some(Expr::expr(Func::lower(expr)).like(LikeExpr::new(format!("%{term}%")).escape('\\')))
}

/// `column` qualified with its table, so it stays unambiguous inside subqueries.
pub(crate) fn qualified<C: ColumnTrait>(column: C) -> Expr {
    Expr::col((column.entity_name(), column))
}

/// Text rendering of a JSON tag-list column, for substring search over its tags.
pub(crate) fn tags_text<C: ColumnTrait>(column: C) -> Expr {
    Func::cast_as(qualified(column), Alias::new("TEXT")).into()
}

/// Narrow `select` to rows whose `column` contains `needle`, ignoring case.
/// Blank or absent needles leave the query unchanged.
pub(crate) fn filter_contains<E, C>(select: Select<E>, column: C, needle: Option<&str>) -> Select<E>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    match contains_ci(qualified(column), needle) {
        Some(cond) => select.filter(cond),
        None => select,
    }
}
