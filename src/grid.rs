use crate::config::AppConfig;
use crate::error::AppError;
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone};

/// Format of the `date` field in `latest.json`.
pub const CAPTURE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Path segment format used in tile URLs.
pub const TILE_PATH_FORMAT: &str = "%Y/%m/%d/%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoordinate {
    pub column: u32,
    pub row: u32,
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)` in the assembled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

/// Geometry and addressing of the published tile grid.
#[derive(Debug, Clone)]
pub struct TileGrid {
    pub grid_size: u32,
    pub tile_width: u32,
    base_url: String,
}

impl TileGrid {
    pub fn new(grid_size: u32, tile_width: u32, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            grid_size,
            tile_width,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.grid_size, config.tile_width, &config.tile_base_url)
    }

    /// Side length of the assembled square image in pixels.
    pub fn canvas_width(&self) -> u32 {
        self.grid_size * self.tile_width
    }

    /// Column-major: every row of column 0, then column 1, and so on.
    pub fn coordinates(&self) -> impl Iterator<Item = TileCoordinate> + '_ {
        (0..self.grid_size)
            .flat_map(move |column| (0..self.grid_size).map(move |row| TileCoordinate { column, row }))
    }

    pub fn tile_rect(&self, coord: TileCoordinate) -> TileRect {
        let w = self.tile_width;
        TileRect {
            x0: coord.column * w,
            y0: coord.row * w,
            x1: (coord.column + 1) * w,
            y1: (coord.row + 1) * w,
        }
    }

    pub fn tile_url(&self, frame: &DateTime<FixedOffset>, coord: TileCoordinate) -> String {
        format!(
            "{}/{}d/{}/{}_{}_{}.png",
            self.base_url,
            self.grid_size,
            self.tile_width,
            frame.format(TILE_PATH_FORMAT),
            coord.column,
            coord.row
        )
    }

    pub fn tile_urls(&self, frame: &DateTime<FixedOffset>) -> Vec<(TileCoordinate, String)> {
        self.coordinates()
            .map(|coord| (coord, self.tile_url(frame, coord)))
            .collect()
    }
}

/// Parses a capture timestamp in `tz` and shifts it back by `delay_hours`.
pub fn frame_time(
    capture_timestamp: &str,
    tz: &FixedOffset,
    delay_hours: i64,
) -> Result<DateTime<FixedOffset>, AppError> {
    let naive = NaiveDateTime::parse_from_str(capture_timestamp, CAPTURE_DATE_FORMAT)
        .map_err(|e| AppError::InvalidTimestamp(format!("{capture_timestamp}: {e}")))?;
    let local = tz
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| AppError::InvalidTimestamp(capture_timestamp.to_string()))?;
    Duration::try_hours(delay_hours)
        .and_then(|delay| local.checked_sub_signed(delay))
        .ok_or_else(|| {
            AppError::InvalidConfig(format!(
                "delay of {delay_hours}h puts {capture_timestamp} out of range"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const BASE: &str = "http://himawari8.nict.go.jp/img/D531106";

    fn tokyo() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn tile_rect_matches_column_and_row() {
        let grid = TileGrid::new(4, 550, BASE);
        for column in 0..4 {
            for row in 0..4 {
                let rect = grid.tile_rect(TileCoordinate { column, row });
                assert_eq!(rect.x0, column * 550);
                assert_eq!(rect.x1, (column + 1) * 550);
                assert_eq!(rect.y0, row * 550);
                assert_eq!(rect.y1, (row + 1) * 550);
            }
        }
    }

    #[test]
    fn tiles_cover_canvas_without_overlap() {
        let grid = TileGrid::new(4, 550, BASE);
        let side = grid.canvas_width();
        assert_eq!(side, 2200);

        // Sample one pixel per 50px cell; each must belong to exactly one tile.
        for y in (0..side).step_by(50) {
            for x in (0..side).step_by(50) {
                let owners = grid
                    .coordinates()
                    .map(|c| grid.tile_rect(c))
                    .filter(|r| x >= r.x0 && x < r.x1 && y >= r.y0 && y < r.y1)
                    .count();
                assert_eq!(owners, 1, "pixel ({x}, {y})");
            }
        }

        let area: u64 = grid
            .coordinates()
            .map(|c| grid.tile_rect(c))
            .map(|r| u64::from(r.x1 - r.x0) * u64::from(r.y1 - r.y0))
            .sum();
        assert_eq!(area, u64::from(side) * u64::from(side));
    }

    #[test]
    fn coordinates_are_column_major() {
        let grid = TileGrid::new(4, 550, BASE);
        let coords: Vec<_> = grid.coordinates().collect();
        assert_eq!(coords.len(), 16);
        assert_eq!(coords[0], TileCoordinate { column: 0, row: 0 });
        assert_eq!(coords[1], TileCoordinate { column: 0, row: 1 });
        assert_eq!(coords[4], TileCoordinate { column: 1, row: 0 });
        assert_eq!(coords[15], TileCoordinate { column: 3, row: 3 });
    }

    #[test]
    fn frame_time_applies_delay() {
        let frame = frame_time("2023-06-01 12:00:00", &tokyo(), 8).unwrap();
        assert_eq!(frame.format(TILE_PATH_FORMAT).to_string(), "2023/06/01/040000");
    }

    #[test]
    fn frame_time_crosses_midnight() {
        let frame = frame_time("2023-06-01 03:00:00", &tokyo(), 8).unwrap();
        assert_eq!(frame.format(TILE_PATH_FORMAT).to_string(), "2023/05/31/190000");
    }

    #[test]
    fn frame_time_rejects_extreme_delay() {
        for delay in [i64::MAX, i64::MIN, 1_000_000_000_000] {
            let err = frame_time("2023-06-01 12:00:00", &tokyo(), delay).unwrap_err();
            assert!(matches!(err, AppError::InvalidConfig(_)), "delay {delay}");
        }
    }

    #[test]
    fn frame_time_rejects_garbage() {
        let err = frame_time("yesterday", &tokyo(), 8).unwrap_err();
        assert!(matches!(err, AppError::InvalidTimestamp(_)));
    }

    #[test]
    fn tile_urls_are_deterministic() {
        let grid = TileGrid::new(4, 550, format!("{BASE}/"));
        let frame = frame_time("2023-06-01 12:00:00", &tokyo(), 8).unwrap();

        let first = grid.tile_urls(&frame);
        let second = grid.tile_urls(&frame);
        assert_eq!(first, second);

        let unique: HashSet<_> = first.iter().map(|(_, url)| url.clone()).collect();
        assert_eq!(unique.len(), 16);

        assert_eq!(
            first[0].1,
            "http://himawari8.nict.go.jp/img/D531106/4d/550/2023/06/01/040000_0_0.png"
        );
        assert_eq!(
            first[6].1,
            "http://himawari8.nict.go.jp/img/D531106/4d/550/2023/06/01/040000_1_2.png"
        );
    }
}
