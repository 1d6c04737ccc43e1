use std::fmt::Write;

use memorito_protocol::{Snapshot, TileView};

pub const COLUMNS: usize = 6;

fn cell(tile: &TileView) -> String {
    match (tile.matched, tile.face_up) {
        (true, _) => format!("({:^4})", tile.symbol),
        (false, true) => format!("[{:^4}]", tile.symbol),
        (false, false) => "[ ?? ]".to_owned(),
    }
}

/// Status line followed by the grid, each row prefixed with the index of its first tile.
pub fn render(snapshot: &Snapshot) -> String {
    let best = snapshot.personal_best.map_or_else(|| "-".to_owned(), |best| best.to_string());
    let mut out = format!(
        "game {} | moves {} | best {} | {}/{} pairs ({:.0}%)\n",
        snapshot.generation,
        snapshot.move_count,
        best,
        snapshot.pairs_matched,
        snapshot.total_pairs,
        snapshot.progress * 100.0,
    );

    for (row, tiles) in snapshot.tiles.chunks(COLUMNS).enumerate() {
        let _ = write!(out, "{:>3} ", row * COLUMNS);
        for tile in tiles {
            out.push_str(&cell(tile));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(symbol: &str, face_up: bool, matched: bool) -> TileView {
        TileView {
            id: 0,
            symbol: symbol.to_owned(),
            face_up,
            matched,
        }
    }

    #[test]
    fn renders_hidden_revealed_and_matched_tiles() {
        let mut tiles = vec![
            tile("Man1", true, true),
            tile("Sou2", true, false),
            tile("Man1", true, true),
            tile("Sou2", false, false),
        ];
        tiles.extend((0..4).map(|_| tile("Pin3", false, false)));
        let snapshot = Snapshot {
            generation: 2,
            tiles,
            move_count: 5,
            personal_best: None,
            is_won: false,
            authenticated: false,
            pairs_matched: 1,
            total_pairs: 4,
            progress: 0.25,
        };

        let rendered = render(&snapshot);

        assert_eq!(
            rendered,
            "game 2 | moves 5 | best - | 1/4 pairs (25%)\n  \
             0 (Man1)[Sou2](Man1)[ ?? ][ ?? ][ ?? ]\n  \
             6 [ ?? ][ ?? ]\n"
        );
    }
}
