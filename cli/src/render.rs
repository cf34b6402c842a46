use std::io::{self, Write};

use gemmines_core::{GameSession, Phase, TileView, coords_to_index};

const HIDDEN: char = '.';
const GEM: char = '*';
const MINE: char = 'x';
const TRIGGERED: char = 'X';

pub fn render(session: &GameSession, out: &mut impl Write) -> io::Result<()> {
    let stake = if session.is_demo() {
        "demo".to_owned()
    } else {
        format!("bet {}", session.bet_amount())
    };
    writeln!(
        out,
        "round {}  {}  mines {}  {}",
        session.round(),
        session.phase(),
        session.mine_count(),
        stake
    )?;

    let size = session.grid_size();
    write!(out, "   ")?;
    for col in 0..size {
        write!(out, "{col:>3}")?;
    }
    writeln!(out)?;

    for row in 0..size {
        write!(out, "{row:>3}")?;
        for col in 0..size {
            let index = coords_to_index((row, col), size);
            let view = index.and_then(|index| session.tile_view(index).ok());
            let symbol = match view {
                Some(TileView::Mine) if session.triggered_mine() == index => TRIGGERED,
                Some(TileView::Mine) => MINE,
                Some(TileView::Gem) => GEM,
                Some(TileView::Hidden) | None => HIDDEN,
            };
            write!(out, "{symbol:>3}")?;
        }
        writeln!(out)?;
    }

    match session.phase() {
        Phase::Playing => writeln!(out, "{} gems left", session.gems_left()),
        Phase::Won => writeln!(out, "You found every gem! `reset` to play again"),
        Phase::Lost => writeln!(out, "Boom, that was a mine! `reset` to play again"),
        Phase::Idle => writeln!(out, "`start` to place mines"),
    }
}
