use primitive_types::U256;

/// Fork activation switches. Selects the jump table, gas formulas and
/// feature availability at VM construction.
#[derive(Clone, Debug)]
pub struct Rules {
	pub chain_id: U256,
	pub is_homestead: bool,
	pub is_eip150: bool,
	pub is_eip155: bool,
	pub is_eip158: bool,
	pub is_byzantium: bool,
	pub is_constantinople: bool,
	pub is_petersburg: bool,
	pub is_istanbul: bool,
	pub is_berlin: bool,
	pub is_london: bool,
	pub is_merge: bool,
	pub is_shanghai: bool,
	pub is_cancun: bool,
}

impl Rules {
	/// Frontier rules: everything off.
	#[must_use]
	pub fn frontier(chain_id: U256) -> Rules {
		Rules {
			chain_id,
			is_homestead: false,
			is_eip150: false,
			is_eip155: false,
			is_eip158: false,
			is_byzantium: false,
			is_constantinople: false,
			is_petersburg: false,
			is_istanbul: false,
			is_berlin: false,
			is_london: false,
			is_merge: false,
			is_shanghai: false,
			is_cancun: false,
		}
	}

	/// Homestead.
	#[must_use]
	pub fn homestead(chain_id: U256) -> Rules {
		let mut rules = Self::frontier(chain_id);
		rules.is_homestead = true;
		rules
	}

	/// Tangerine Whistle (EIP-150).
	#[must_use]
	pub fn tangerine_whistle(chain_id: U256) -> Rules {
		let mut rules = Self::homestead(chain_id);
		rules.is_eip150 = true;
		rules
	}

	/// Spurious Dragon (EIP-155, EIP-158).
	#[must_use]
	pub fn spurious_dragon(chain_id: U256) -> Rules {
		let mut rules = Self::tangerine_whistle(chain_id);
		rules.is_eip155 = true;
		rules.is_eip158 = true;
		rules
	}

	/// Byzantium.
	#[must_use]
	pub fn byzantium(chain_id: U256) -> Rules {
		let mut rules = Self::spurious_dragon(chain_id);
		rules.is_byzantium = true;
		rules
	}

	/// Constantinople.
	#[must_use]
	pub fn constantinople(chain_id: U256) -> Rules {
		let mut rules = Self::byzantium(chain_id);
		rules.is_constantinople = true;
		rules
	}

	/// Petersburg (Constantinople with EIP-1283 disabled).
	#[must_use]
	pub fn petersburg(chain_id: U256) -> Rules {
		let mut rules = Self::constantinople(chain_id);
		rules.is_petersburg = true;
		rules
	}

	/// Istanbul.
	#[must_use]
	pub fn istanbul(chain_id: U256) -> Rules {
		let mut rules = Self::petersburg(chain_id);
		rules.is_istanbul = true;
		rules
	}

	/// Berlin.
	#[must_use]
	pub fn berlin(chain_id: U256) -> Rules {
		let mut rules = Self::istanbul(chain_id);
		rules.is_berlin = true;
		rules
	}

	/// London.
	#[must_use]
	pub fn london(chain_id: U256) -> Rules {
		let mut rules = Self::berlin(chain_id);
		rules.is_london = true;
		rules
	}

	/// The Merge.
	#[must_use]
	pub fn merge(chain_id: U256) -> Rules {
		let mut rules = Self::london(chain_id);
		rules.is_merge = true;
		rules
	}

	/// Shanghai.
	#[must_use]
	pub fn shanghai(chain_id: U256) -> Rules {
		let mut rules = Self::merge(chain_id);
		rules.is_shanghai = true;
		rules
	}

	/// Cancun.
	#[must_use]
	pub fn cancun(chain_id: U256) -> Rules {
		let mut rules = Self::shanghai(chain_id);
		rules.is_cancun = true;
		rules
	}
}
