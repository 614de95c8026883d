use crate::{
    error::{AppError, AppResult},
    models::{GenreChampion, YearPlaytime},
    store::{AggOp, Table, Value},
};

use super::columns::{GENRES, PLAYTIME, RELEASE_YEAR, USER_ID};

/// Upper-cases the first character and lower-cases the rest
///
/// This is the only normalization applied before matching, so `"rpg"`
/// becomes `"Rpg"` and will not match a stored `"RPG"`.
pub fn normalize_genre(genre: &str) -> String {
    let mut chars = genre.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn has_genre(genres: &Value, genre: &str) -> bool {
    match genres {
        Value::List(items) => items.iter().any(|g| g.as_str() == Some(genre)),
        Value::Str(s) => s.contains(genre),
        _ => false,
    }
}

/// The user with the most playtime in `genre` and their hours per year
///
/// Ties on total playtime go to the lexicographically smallest user id.
pub fn genre_champion(plays: &Table, genre: &str) -> AppResult<GenreChampion> {
    let genre = normalize_genre(genre);

    let in_genre = plays.filter(|row| Ok(has_genre(row.get(GENRES)?, &genre)))?;
    if in_genre.is_empty() {
        return Err(AppError::not_found("genre"));
    }

    let totals = in_genre.group_aggregate(&[USER_ID], PLAYTIME, AggOp::Sum)?;

    // Groups come back in ascending user order, so keep the first maximum
    let mut best: Option<(&Value, f64)> = None;
    for row in totals.rows() {
        let hours = row.number(PLAYTIME)?.unwrap_or(0.0);
        match best {
            Some((_, top)) if hours <= top => {}
            _ => best = Some((row.get(USER_ID)?, hours)),
        }
    }
    let (user, total_hours) = best.ok_or_else(|| AppError::not_found("genre"))?;

    let history = in_genre
        .filter(|row| Ok(row.get(USER_ID)? == user))?
        .group_aggregate(&[RELEASE_YEAR], PLAYTIME, AggOp::Sum)?;

    let mut play_history = Vec::with_capacity(history.len());
    for row in history.rows() {
        play_history.push(YearPlaytime {
            release_year: row.integer(RELEASE_YEAR)?.unwrap_or_default(),
            hours: row.number(PLAYTIME)?.unwrap_or(0.0),
        });
    }

    tracing::debug!(
        genre = %genre,
        user = %user,
        total_hours,
        years = play_history.len(),
        "Genre champion selected"
    );

    Ok(GenreChampion {
        genre,
        user_id: user.to_string(),
        play_history,
    })
}
