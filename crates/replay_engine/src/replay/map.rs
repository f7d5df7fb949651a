use thiserror::Error;

use super::{Cell, Map};
use crate::playback::Entity;

const ROW_PREFIX: &str = "m ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapFormatError {
    #[error("invalid map character '{character}' at row {row}, col {col}")]
    InvalidMapCharacter {
        row: usize,
        col: usize,
        character: char,
    },
    #[error("map grid is {found_rows}x{found_cols}, expected {height}x{width}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        found_rows: usize,
        found_cols: usize,
    },
}

/// Builds the static terrain (water, hills, starting food) in row-major order.
/// Starting food grows in during the first Spawn phase like spawned food.
pub fn parse_map(map: &Map) -> Result<Vec<Entity>, MapFormatError> {
    let rows = grid_rows(&map.contents);
    check_dimensions(map, &rows)?;

    let mut terrain = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        for (col, character) in line.chars().enumerate() {
            let cell = Cell::new(row, col);
            match character {
                '.' => {}
                '%' => terrain.push(Entity::water(cell)),
                '*' => terrain.push(Entity::food(cell)),
                _ => {
                    let Some(player) = character.to_digit(10) else {
                        return Err(MapFormatError::InvalidMapCharacter {
                            row,
                            col,
                            character,
                        });
                    };
                    terrain.push(Entity::hill(cell, player as usize));
                }
            }
        }
    }
    Ok(terrain)
}

fn grid_rows(contents: &str) -> Vec<&str> {
    let lines = contents.lines().map(str::trim_end);
    if contents.lines().any(|line| line.starts_with(ROW_PREFIX)) {
        lines
            .filter_map(|line| line.strip_prefix(ROW_PREFIX).map(str::trim))
            .collect()
    } else {
        lines.filter(|line| !line.is_empty()).collect()
    }
}

fn check_dimensions(map: &Map, rows: &[&str]) -> Result<(), MapFormatError> {
    let ragged = rows
        .iter()
        .map(|row| row.chars().count())
        .find(|len| *len != map.width);
    if rows.len() == map.height && ragged.is_none() {
        return Ok(());
    }
    Err(MapFormatError::DimensionMismatch {
        width: map.width,
        height: map.height,
        found_rows: rows.len(),
        found_cols: ragged.unwrap_or(map.width),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{EntityKind, HillSprite, FOOD_SIZE};

    fn map(width: usize, height: usize, contents: &str) -> Map {
        Map {
            width,
            height,
            contents: contents.to_string(),
        }
    }

    #[test]
    fn parses_water_hills_and_food() {
        let terrain = parse_map(&map(3, 2, "0%.\n*.1")).expect("map");

        assert_eq!(terrain.len(), 4);
        assert_eq!(terrain[0].kind, EntityKind::Hill { player: 0, sprite: HillSprite::Alive });
        assert_eq!(terrain[0].cell(), Cell::new(0, 0));
        assert_eq!(terrain[1].kind, EntityKind::Water);
        assert_eq!(terrain[1].cell(), Cell::new(0, 1));
        assert_eq!(terrain[2].kind, EntityKind::Food);
        assert_eq!(terrain[2].cell(), Cell::new(1, 0));
        assert_eq!(terrain[2].size, 0.0);
        assert_eq!(terrain[2].target_size, FOOD_SIZE);
        assert_eq!(terrain[3].kind, EntityKind::Hill { player: 1, sprite: HillSprite::Alive });
        assert!(terrain.iter().all(|entity| entity.alive));
    }

    #[test]
    fn prefixed_rows_skip_header_lines() {
        let contents = "rows 2\ncols 2\nplayers 2\nm 0.\nm .1\n";
        let terrain = parse_map(&map(2, 2, contents)).expect("map");

        assert_eq!(terrain.len(), 2);
        assert_eq!(terrain[1].cell(), Cell::new(1, 1));
    }

    #[test]
    fn invalid_character_reports_position() {
        let err = parse_map(&map(3, 2, "...\n.x.")).expect_err("invalid");
        assert_eq!(
            err,
            MapFormatError::InvalidMapCharacter {
                row: 1,
                col: 1,
                character: 'x',
            }
        );
    }

    #[test]
    fn row_count_mismatch_is_rejected() {
        let err = parse_map(&map(2, 3, "..\n..")).expect_err("short");
        assert_eq!(
            err,
            MapFormatError::DimensionMismatch {
                width: 2,
                height: 3,
                found_rows: 2,
                found_cols: 2,
            }
        );
    }

    #[test]
    fn ragged_row_is_rejected() {
        let err = parse_map(&map(3, 2, "...\n.....")).expect_err("ragged");
        assert!(matches!(
            err,
            MapFormatError::DimensionMismatch { found_cols: 5, .. }
        ));
    }

    #[test]
    fn prefixed_rows_ignore_surrounding_whitespace() {
        let contents = "rows 2\ncols 2\nplayers 1\nm 0. \nm .. \n";
        let terrain = parse_map(&map(2, 2, contents)).expect("map");

        assert_eq!(terrain.len(), 1);
        assert_eq!(terrain[0].cell(), Cell::new(0, 0));
    }

    #[test]
    fn plain_rows_ignore_trailing_whitespace() {
        let terrain = parse_map(&map(2, 2, "%. \n.%\t\n")).expect("map");
        assert_eq!(terrain.len(), 2);
    }

    #[test]
    fn windows_line_endings_are_accepted() {
        let terrain = parse_map(&map(2, 2, "%.\r\n.%\r\n")).expect("map");
        assert_eq!(terrain.len(), 2);
    }
}
