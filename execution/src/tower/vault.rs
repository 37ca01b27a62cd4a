//! The Vault.
//!
//! The vault is locked with six distinct digits. The player has four guesses,
//! each scored by exact matches and by digits present elsewhere in the code.
//! Cracking it pays one of four weighted prizes; failing pays a consolation
//! keyed by the best guess.

use super::{money, GameRng};
use serde::Serialize;

/// Digits in a vault code.
pub const CODE_LENGTH: usize = 6;

/// Guesses before the vault stays shut.
pub const MAX_ATTEMPTS: usize = 4;

/// Cash prize for cracking the vault.
pub const JACKPOT: u64 = 1_000_000;

/// Consolation indexed by the best guess's exact matches (0..=5).
const PARTIAL_REWARDS: [u64; CODE_LENGTH] = [0, 10_000, 25_000, 100_000, 200_000, 500_000];

pub type Code = [u8; CODE_LENGTH];

/// Parse a guess: exactly six ASCII digits, none repeated.
pub fn parse_code(input: &str) -> Option<Code> {
    let bytes = input.trim().as_bytes();
    if bytes.len() != CODE_LENGTH {
        return None;
    }
    let mut code = [0u8; CODE_LENGTH];
    let mut seen = [false; 10];
    for (slot, b) in code.iter_mut().zip(bytes) {
        if !b.is_ascii_digit() {
            return None;
        }
        let digit = b - b'0';
        if seen[digit as usize] {
            return None;
        }
        seen[digit as usize] = true;
        *slot = digit;
    }
    Some(code)
}

/// Returns `(correct_position, correct_wrong_position)`.
pub fn score_guess(secret: &Code, guess: &Code) -> (u8, u8) {
    let mut exact = 0;
    let mut misplaced = 0;
    for (i, digit) in guess.iter().enumerate() {
        if secret[i] == *digit {
            exact += 1;
        } else if secret.contains(digit) {
            misplaced += 1;
        }
    }
    (exact, misplaced)
}

/// Consolation for a vault that was never cracked.
pub fn partial_reward(best_correct_position: u8) -> u64 {
    PARTIAL_REWARDS
        .get(best_correct_position as usize)
        .copied()
        .unwrap_or(JACKPOT)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GuessScore {
    pub code: String,
    pub correct_position: u8,
    pub correct_wrong_position: u8,
}

/// What the vault paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VaultReward {
    Jackpot { amount: u64 },
    /// Total doubled.
    Doubled,
    /// A `1` prepended to the total.
    PrependOne,
    /// Location of a game-over tile the player has not reached yet.
    GameOverRevealed { floor: usize },
    Partial { amount: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VaultGuess {
    pub score: GuessScore,
    pub attempts_left: usize,
    pub cracked: bool,
    pub reward: Option<VaultReward>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Vault {
    #[serde(skip)]
    secret: Code,
    attempts: Vec<GuessScore>,
    reward: Option<VaultReward>,
    active: bool,
}

impl Vault {
    pub fn start(rng: &mut GameRng) -> Self {
        let mut digits: Vec<u8> = (0..10).collect();
        rng.shuffle(&mut digits);
        let mut secret = [0u8; CODE_LENGTH];
        secret.copy_from_slice(&digits[..CODE_LENGTH]);
        Self {
            secret,
            attempts: Vec::new(),
            reward: None,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn attempts(&self) -> &[GuessScore] {
        &self.attempts
    }

    pub fn attempts_left(&self) -> usize {
        MAX_ATTEMPTS.saturating_sub(self.attempts.len())
    }

    pub fn reward(&self) -> Option<VaultReward> {
        self.reward
    }

    /// Score a guess. Malformed guesses are rejected without using an
    /// attempt.
    ///
    /// `hazards` lists unreached floors hiding a game-over tile, one of which
    /// may be revealed as the prize.
    pub fn guess(
        &mut self,
        input: &str,
        total: &mut u64,
        rng: &mut GameRng,
        hazards: &[usize],
    ) -> Option<VaultGuess> {
        if !self.active {
            return None;
        }
        let code = parse_code(input)?;
        let (correct_position, correct_wrong_position) = score_guess(&self.secret, &code);
        let score = GuessScore {
            code: code.iter().map(|d| char::from(b'0' + d)).collect(),
            correct_position,
            correct_wrong_position,
        };
        self.attempts.push(score.clone());

        let cracked = correct_position as usize == CODE_LENGTH;
        if cracked {
            self.reward = Some(Self::crack(total, rng, hazards));
            self.active = false;
        } else if self.attempts.len() >= MAX_ATTEMPTS {
            let best = self
                .attempts
                .iter()
                .map(|a| a.correct_position)
                .max()
                .unwrap_or(0);
            let amount = partial_reward(best);
            *total = total.saturating_add(amount);
            self.reward = Some(VaultReward::Partial { amount });
            self.active = false;
        }

        Some(VaultGuess {
            score,
            attempts_left: self.attempts_left(),
            cracked,
            reward: self.reward,
        })
    }

    /// Weighted prize: 40% jackpot, 30% double, 20% prepend one, 10% reveal
    /// a game-over floor (jackpot when none is left).
    fn crack(total: &mut u64, rng: &mut GameRng, hazards: &[usize]) -> VaultReward {
        let roll = rng.next_bounded(100);
        if roll >= 90 && !hazards.is_empty() {
            let floor = hazards[rng.next_bounded(hazards.len() as u64) as usize];
            return VaultReward::GameOverRevealed { floor };
        }
        if (40..70).contains(&roll) {
            *total = total.saturating_mul(2);
            VaultReward::Doubled
        } else if (70..90).contains(&roll) {
            *total = money::add_one(*total);
            VaultReward::PrependOne
        } else {
            *total = total.saturating_add(JACKPOT);
            VaultReward::Jackpot { amount: JACKPOT }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault_with(secret: Code) -> Vault {
        Vault {
            secret,
            attempts: Vec::new(),
            reward: None,
            active: true,
        }
    }

    #[test]
    fn test_score_guess_by_hand() {
        let secret = parse_code("123456").unwrap();
        let guess = parse_code("135792").unwrap();
        // 1 is in place; 3, 5 and 2 are in the code but misplaced.
        assert_eq!(score_guess(&secret, &guess), (1, 3));
        assert_eq!(score_guess(&secret, &secret), (6, 0));
        assert_eq!(
            score_guess(&secret, &parse_code("654321").unwrap()),
            (0, 6)
        );
        assert_eq!(
            score_guess(&secret, &parse_code("078921").unwrap()),
            (0, 2)
        );
    }

    #[test]
    fn test_parse_code_rejects_bad_input() {
        assert!(parse_code("12345").is_none());
        assert!(parse_code("1234567").is_none());
        assert!(parse_code("112345").is_none());
        assert!(parse_code("12a456").is_none());
        assert_eq!(parse_code(" 098765 "), Some([0, 9, 8, 7, 6, 5]));
    }

    #[test]
    fn test_start_uses_distinct_digits() {
        for seed in 0..20 {
            let vault = Vault::start(&mut GameRng::new(seed, 0, 0));
            let mut digits = vault.secret.to_vec();
            digits.sort();
            digits.dedup();
            assert_eq!(digits.len(), CODE_LENGTH);
            assert!(digits.iter().all(|d| *d < 10));
        }
    }

    #[test]
    fn test_invalid_guess_keeps_attempt() {
        let mut vault = vault_with([1, 2, 3, 4, 5, 6]);
        let mut total = 0;
        let mut rng = GameRng::new(1, 1, 1);
        assert!(vault.guess("111111", &mut total, &mut rng, &[]).is_none());
        assert_eq!(vault.attempts_left(), MAX_ATTEMPTS);
        assert!(vault.is_active());
    }

    #[test]
    fn test_partial_reward_uses_best_guess() {
        let mut vault = vault_with([1, 2, 3, 4, 5, 6]);
        let mut total = 1_000;
        let mut rng = GameRng::new(1, 1, 1);
        // 3 exact
        vault.guess("123789", &mut total, &mut rng, &[]).unwrap();
        // 1 exact
        vault.guess("102789", &mut total, &mut rng, &[]).unwrap();
        vault.guess("789012", &mut total, &mut rng, &[]).unwrap();
        let last = vault.guess("987012", &mut total, &mut rng, &[]).unwrap();

        assert!(!last.cracked);
        assert_eq!(last.attempts_left, 0);
        assert_eq!(last.reward, Some(VaultReward::Partial { amount: 100_000 }));
        assert_eq!(total, 101_000);
        assert!(!vault.is_active());
        assert!(vault.guess("123456", &mut total, &mut rng, &[]).is_none());
    }

    #[test]
    fn test_partial_reward_table() {
        assert_eq!(partial_reward(5), 500_000);
        assert_eq!(partial_reward(4), 200_000);
        assert_eq!(partial_reward(3), 100_000);
        assert_eq!(partial_reward(2), 25_000);
        assert_eq!(partial_reward(1), 10_000);
        assert_eq!(partial_reward(0), 0);
    }

    #[test]
    fn test_crack_pays_a_prize() {
        for seed in 0..100 {
            let mut vault = vault_with([9, 8, 7, 6, 5, 4]);
            let mut total = 5_000;
            let mut rng = GameRng::new(seed, 2, 1);
            let result = vault.guess("987654", &mut total, &mut rng, &[12]).unwrap();
            assert!(result.cracked);
            assert!(!vault.is_active());
            match result.reward.unwrap() {
                VaultReward::Jackpot { amount } => assert_eq!(total, 5_000 + amount),
                VaultReward::Doubled => assert_eq!(total, 10_000),
                VaultReward::PrependOne => assert_eq!(total, 15_000),
                VaultReward::GameOverRevealed { floor } => {
                    assert_eq!(floor, 12);
                    assert_eq!(total, 5_000);
                }
                VaultReward::Partial { .. } => panic!("cracked vault paid a consolation"),
            }
        }
    }

    #[test]
    fn test_crack_without_hazards_never_reveals() {
        for seed in 0..200 {
            let mut total = 0;
            let reward = Vault::crack(&mut total, &mut GameRng::new(seed, 3, 0), &[]);
            assert!(!matches!(reward, VaultReward::GameOverRevealed { .. }));
        }
    }
}
