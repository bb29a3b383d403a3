//! Issuance gateway: locks underlying and issues NYT with PYT (or xPYT) in
//! equal underlying-equivalent amounts, and burns them back.

use std::collections::HashMap;

use anchor_lang::prelude::*;
use fix::prelude::*;

use crate::error::SwapperError::{UnknownVault, WrapperMismatch};
use crate::ledger::Ledger;
use crate::pda;
use crate::wrapper::ShareWrapper;

/// Claims issued by one `enter_with_underlying` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnterOutcome {
  pub nyt_amount: UFix64<N9>,
  /// Raw PYT, or xPYT shares when a wrapper was given.
  pub pyt_amount: UFix64<N9>,
}

pub trait IssuanceGateway {
  fn address(&self) -> Pubkey;

  fn underlying(&self, vault: Pubkey) -> Result<Pubkey>;

  fn nyt(&self, vault: Pubkey) -> Pubkey {
    pda::nyt(self.address(), vault)
  }

  fn pyt(&self, vault: Pubkey) -> Pubkey {
    pda::pyt(self.address(), vault)
  }

  /// Pulls `amount` underlying from `caller`, mints `amount` NYT to
  /// `nyt_recipient` and `amount` PYT to `pyt_recipient`, deposited into
  /// `xpyt` first when one is given.
  #[allow(clippy::too_many_arguments)]
  fn enter_with_underlying(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    nyt_recipient: Pubkey,
    pyt_recipient: Pubkey,
    vault: Pubkey,
    xpyt: Option<&dyn ShareWrapper>,
    amount: UFix64<N9>,
  ) -> Result<EnterOutcome>;

  /// Burns `amount` NYT and `amount` PYT (withdrawn from `caller`'s xPYT
  /// when a wrapper is given) and pays `amount` underlying to `recipient`.
  fn exit_to_underlying(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    recipient: Pubkey,
    vault: Pubkey,
    xpyt: Option<&dyn ShareWrapper>,
    amount: UFix64<N9>,
  ) -> Result<UFix64<N9>>;
}

/// Gate keeping vault deposits in its own ledger account. Vault yield is not
/// modelled, so underlying backs NYT 1:1.
#[derive(Clone, Debug, Default)]
pub struct Gate {
  address: Pubkey,
  vaults: HashMap<Pubkey, Pubkey>,
}

impl Gate {
  #[must_use]
  pub fn new(address: Pubkey) -> Gate {
    Gate {
      address,
      vaults: HashMap::new(),
    }
  }

  /// Registers `vault` as accepting `underlying` deposits.
  pub fn add_vault(&mut self, vault: Pubkey, underlying: Pubkey) {
    self.vaults.insert(vault, underlying);
  }

  fn check_wrapper(
    &self,
    vault: Pubkey,
    xpyt: &dyn ShareWrapper,
  ) -> Result<()> {
    if xpyt.asset() == self.pyt(vault) {
      Ok(())
    } else {
      Err(WrapperMismatch.into())
    }
  }
}

impl IssuanceGateway for Gate {
  fn address(&self) -> Pubkey {
    self.address
  }

  fn underlying(&self, vault: Pubkey) -> Result<Pubkey> {
    self.vaults.get(&vault).copied().ok_or(UnknownVault.into())
  }

  fn enter_with_underlying(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    nyt_recipient: Pubkey,
    pyt_recipient: Pubkey,
    vault: Pubkey,
    xpyt: Option<&dyn ShareWrapper>,
    amount: UFix64<N9>,
  ) -> Result<EnterOutcome> {
    let underlying = self.underlying(vault)?;
    let pyt = self.pyt(vault);
    ledger.transfer_from(
      underlying,
      self.address,
      caller,
      self.address,
      amount,
    )?;
    ledger.mint_to(self.nyt(vault), nyt_recipient, amount)?;
    let pyt_amount = match xpyt {
      Some(xpyt) => {
        self.check_wrapper(vault, xpyt)?;
        ledger.mint_to(pyt, self.address, amount)?;
        ledger.approve_max_if_needed(pyt, self.address, xpyt.address(), amount);
        xpyt.deposit(ledger, self.address, amount, pyt_recipient)?
      }
      None => {
        ledger.mint_to(pyt, pyt_recipient, amount)?;
        amount
      }
    };
    Ok(EnterOutcome {
      nyt_amount: amount,
      pyt_amount,
    })
  }

  fn exit_to_underlying(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    recipient: Pubkey,
    vault: Pubkey,
    xpyt: Option<&dyn ShareWrapper>,
    amount: UFix64<N9>,
  ) -> Result<UFix64<N9>> {
    let underlying = self.underlying(vault)?;
    let pyt = self.pyt(vault);
    ledger.burn(self.nyt(vault), caller, amount)?;
    match xpyt {
      Some(xpyt) => {
        self.check_wrapper(vault, xpyt)?;
        xpyt.withdraw(ledger, self.address, amount, self.address, caller)?;
        ledger.burn(pyt, self.address, amount)?;
      }
      None => ledger.burn(pyt, caller, amount)?,
    }
    ledger.transfer(underlying, self.address, recipient, amount)?;
    Ok(amount)
  }
}
