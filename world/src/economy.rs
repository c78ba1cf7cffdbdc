//! Coin balance and life counter.

/// Coins and lives owned by the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Economy {
    coins: u32,
    lives: u32,
}

/// Price that could not be covered by the current balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Shortfall {
    pub(crate) cost: u32,
    pub(crate) available: u32,
}

impl Economy {
    pub(crate) const fn new(coins: u32, lives: u32) -> Self {
        Self { coins, lives }
    }

    pub(crate) const fn coins(&self) -> u32 {
        self.coins
    }

    pub(crate) const fn lives(&self) -> u32 {
        self.lives
    }

    /// Deducts `cost` when affordable and leaves the balance untouched otherwise.
    pub(crate) fn try_spend(&mut self, cost: u32) -> Result<(), Shortfall> {
        match self.coins.checked_sub(cost) {
            Some(remaining) => {
                self.coins = remaining;
                Ok(())
            }
            None => Err(Shortfall {
                cost,
                available: self.coins,
            }),
        }
    }

    pub(crate) fn earn(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Removes one life and returns the lives left.
    pub(crate) fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}
