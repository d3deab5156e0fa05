//! Random legal games, recorded through a [`Player`].
//!
//! Used to generate demo records and to drive record round-trip tests.

use crate::board::StoneType;
use crate::constants::PLAYOUT_TRIES;
use crate::player::Player;
use crate::scan::DIRECTIONS;

/// Play up to `moves` random moves for alternating colors.
///
/// Candidates are the empty points that are not an eye of the color to
/// play, tried in random order. When none of the first `PLAYOUT_TRIES`
/// candidates is legal the color passes. Two passes in a row end the game.
/// Returns the number of moves and passes recorded.
pub fn random_game(player: &mut Player, moves: usize, rng: &mut fastrand::Rng) -> usize {
    let mut played = 0;
    let mut passes = 0;

    while played < moves && passes < 2 {
        let placed = choose_random_move(player, rng)
            .is_some_and(|(x, y)| player.put_stone(x, y).is_ok());
        if placed {
            passes = 0;
        } else {
            player.pass();
            passes += 1;
        }
        played += 1;
    }
    played
}

/// A random legal point for the color to play.
fn choose_random_move(player: &Player, rng: &mut fastrand::Rng) -> Option<(i32, i32)> {
    let stone = player.next_stone();
    let size = player.size() as i32;
    let mut candidates: Vec<(i32, i32)> = (0..size)
        .flat_map(|y| (0..size).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            player.stone(x, y) == Some(StoneType::Empty) && !is_eye(player, x, y, stone)
        })
        .collect();
    rng.shuffle(&mut candidates);

    // Try on a copy of the engine so rejected candidates never reach the record.
    candidates
        .into_iter()
        .take(PLAYOUT_TRIES)
        .find(|&(x, y)| player.rule().clone().put_stone(x, y).is_ok())
}

/// Every on-board neighbour holds `stone`.
fn is_eye(player: &Player, x: i32, y: i32, stone: StoneType) -> bool {
    DIRECTIONS.iter().all(|(dx, dy)| match player.stone(x + dx, y + dy) {
        None => true,
        Some(s) => s == stone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_game_respects_limit() {
        let mut player = Player::with_size(9).unwrap();
        let mut rng = fastrand::Rng::with_seed(7);
        let played = random_game(&mut player, 40, &mut rng);
        assert_eq!(played, 40);
        assert_eq!(player.move_count(), 40);
        assert!(player.is_leaf());
    }

    #[test]
    fn test_random_game_ends_with_two_passes() {
        let mut player = Player::with_size(3).unwrap();
        let mut rng = fastrand::Rng::with_seed(1);
        let played = random_game(&mut player, 1000, &mut rng);
        assert!(played < 1000);
        assert!(player.is_pass());
        player.back();
        assert!(player.is_pass());
    }

    #[test]
    fn test_same_seed_same_game() {
        let record = |seed| {
            let mut player = Player::with_size(7).unwrap();
            random_game(&mut player, 30, &mut fastrand::Rng::with_seed(seed));
            player.to_sgf()
        };
        assert_eq!(record(42), record(42));
    }
}
