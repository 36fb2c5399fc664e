//! Candidate generator.
//!
//! Yields, in a fixed order:
//! 1. Single legs: long and short of every contract
//! 2. Vertical spreads: every same-kind pair `K1 < K2`, both orientations
//! 3. Straddles and strangles: every (call, put) pair, both long or both short
//! 4. Butterflies and condors built around the ATM anchor
//!
//! The sequence is lazy and [`CandidateGenerator::iter`] can be called any
//! number of times; each call walks the same candidates in the same order.
//! Archetypes with more than `max_legs` legs are never built.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use super::filter::RelevantStrikes;
use crate::options::{Contract, Leg, OptionKind, Strategy, StrategyType};

type Candidates<'a> = Box<dyn Iterator<Item = Strategy> + Send + 'a>;

/// Lazy, restartable source of candidate strategies.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    contracts: Vec<Arc<Contract>>,
    by_strike: BTreeMap<(OptionKind, Decimal), Arc<Contract>>,
    bodies: Vec<Decimal>,
    wings: Vec<Decimal>,
    max_legs: usize,
}

impl CandidateGenerator {
    /// Build a generator over `contracts`, which must share one underlying
    /// and one expiration.
    #[must_use]
    pub fn new(contracts: Vec<Arc<Contract>>, relevant: &RelevantStrikes, max_legs: usize) -> Self {
        let mut contracts = contracts;
        contracts.sort_by(|a, b| {
            (a.kind(), a.strike(), a.symbol()).cmp(&(b.kind(), b.strike(), b.symbol()))
        });

        let mut by_strike = BTreeMap::new();
        for contract in &contracts {
            by_strike
                .entry((contract.kind(), contract.strike()))
                .or_insert_with(|| Arc::clone(contract));
        }

        let atm = relevant.atm();
        let bodies: Vec<Decimal> = [relevant.below(atm), Some(atm), relevant.above(atm)]
            .into_iter()
            .flatten()
            .collect();

        let mut wings: Vec<Decimal> = relevant.boundary_anchors().iter().copied().collect();
        if let Some((lowest, highest)) = relevant.extremes() {
            wings.push(lowest);
            wings.push(highest);
        }
        wings.sort();
        wings.dedup();

        Self {
            contracts,
            by_strike,
            bodies,
            wings,
            max_legs,
        }
    }

    /// Contracts candidates are drawn from, in generation order.
    #[must_use]
    pub fn contracts(&self) -> &[Arc<Contract>] {
        &self.contracts
    }

    /// Walk every candidate from the start.
    pub fn iter(&self) -> impl Iterator<Item = Strategy> + Send + '_ {
        let mut stages: Vec<Candidates<'_>> = vec![Box::new(self.single_legs())];
        if self.max_legs >= 2 {
            stages.push(Box::new(self.verticals()));
            stages.push(Box::new(self.straddles_and_strangles()));
        }
        if self.max_legs >= 3 {
            stages.push(Box::new(self.butterflies()));
        }
        if self.max_legs >= 4 {
            stages.push(Box::new(self.iron_butterflies()));
            stages.push(Box::new(self.condors()));
        }
        stages.into_iter().flatten()
    }

    fn single_legs(&self) -> impl Iterator<Item = Strategy> + Send + '_ {
        self.contracts.iter().flat_map(|c| {
            let (long, short) = match c.kind() {
                OptionKind::Call => (StrategyType::LongCall, StrategyType::ShortCall),
                OptionKind::Put => (StrategyType::LongPut, StrategyType::ShortPut),
            };
            [build(long, &[(c, 1)]), build(short, &[(c, -1)])]
                .into_iter()
                .flatten()
        })
    }

    fn verticals(&self) -> impl Iterator<Item = Strategy> + Send + '_ {
        let contracts = &self.contracts;
        contracts.iter().enumerate().flat_map(move |(i, low)| {
            contracts[i + 1..]
                .iter()
                .filter(move |high| high.kind() == low.kind() && high.strike() > low.strike())
                .flat_map(move |high| {
                    let (long_low, long_high) = match low.kind() {
                        OptionKind::Call => {
                            (StrategyType::BullCallSpread, StrategyType::BearCallSpread)
                        }
                        OptionKind::Put => {
                            (StrategyType::BullPutSpread, StrategyType::BearPutSpread)
                        }
                    };
                    [
                        build(long_low, &[(low, 1), (high, -1)]),
                        build(long_high, &[(low, -1), (high, 1)]),
                    ]
                    .into_iter()
                    .flatten()
                })
        })
    }

    fn straddles_and_strangles(&self) -> impl Iterator<Item = Strategy> + Send + '_ {
        let calls = self.contracts.iter().filter(|c| c.is_call());
        calls.flat_map(move |call| {
            self.contracts
                .iter()
                .filter(|c| c.is_put())
                .flat_map(move |put| {
                    let (long, short) = if call.strike() == put.strike() {
                        (StrategyType::LongStraddle, StrategyType::ShortStraddle)
                    } else {
                        (StrategyType::LongStrangle, StrategyType::ShortStrangle)
                    };
                    [
                        build(long, &[(call, 1), (put, 1)]),
                        build(short, &[(call, -1), (put, -1)]),
                    ]
                    .into_iter()
                    .flatten()
                })
        })
    }

    /// (lower wing, body, upper wing) triples.
    fn wing_triples(&self) -> Vec<(Decimal, Decimal, Decimal)> {
        let mut out = Vec::new();
        for &body in &self.bodies {
            for &lo in self.wings.iter().filter(|&&w| w < body) {
                for &hi in self.wings.iter().filter(|&&w| w > body) {
                    out.push((lo, body, hi));
                }
            }
        }
        out
    }

    /// (lower wing, lower body, upper body, upper wing) quadruples.
    fn condor_quads(&self) -> Vec<(Decimal, Decimal, Decimal, Decimal)> {
        let mut out = Vec::new();
        for (i, &b1) in self.bodies.iter().enumerate() {
            for &b2 in &self.bodies[i + 1..] {
                for &lo in self.wings.iter().filter(|&&w| w < b1) {
                    for &hi in self.wings.iter().filter(|&&w| w > b2) {
                        out.push((lo, b1, b2, hi));
                    }
                }
            }
        }
        out
    }

    fn butterflies(&self) -> impl Iterator<Item = Strategy> + Send + '_ {
        self.wing_triples().into_iter().flat_map(move |(lo, body, hi)| {
            [
                (OptionKind::Call, StrategyType::LongCallButterfly),
                (OptionKind::Put, StrategyType::LongPutButterfly),
            ]
            .into_iter()
            .filter_map(move |(kind, strategy_type)| {
                let legs = [
                    (self.contract(kind, lo)?, 1),
                    (self.contract(kind, body)?, -2),
                    (self.contract(kind, hi)?, 1),
                ];
                build(strategy_type, &legs)
            })
            .flat_map(both_orientations)
        })
    }

    fn iron_butterflies(&self) -> impl Iterator<Item = Strategy> + Send + '_ {
        self.wing_triples()
            .into_iter()
            .filter_map(move |(lo, body, hi)| {
                let legs = [
                    (self.contract(OptionKind::Put, lo)?, 1),
                    (self.contract(OptionKind::Put, body)?, -1),
                    (self.contract(OptionKind::Call, body)?, -1),
                    (self.contract(OptionKind::Call, hi)?, 1),
                ];
                build(StrategyType::IronButterfly, &legs)
            })
            .flat_map(both_orientations)
    }

    fn condors(&self) -> impl Iterator<Item = Strategy> + Send + '_ {
        self.condor_quads()
            .into_iter()
            .flat_map(move |(lo, b1, b2, hi)| {
                let iron = || {
                    let legs = [
                        (self.contract(OptionKind::Put, lo)?, 1),
                        (self.contract(OptionKind::Put, b1)?, -1),
                        (self.contract(OptionKind::Call, b2)?, -1),
                        (self.contract(OptionKind::Call, hi)?, 1),
                    ];
                    build(StrategyType::IronCondor, &legs)
                };
                let same_kind = |kind: OptionKind, strategy_type: StrategyType| {
                    let legs = [
                        (self.contract(kind, lo)?, 1),
                        (self.contract(kind, b1)?, -1),
                        (self.contract(kind, b2)?, -1),
                        (self.contract(kind, hi)?, 1),
                    ];
                    build(strategy_type, &legs)
                };
                [
                    iron(),
                    same_kind(OptionKind::Call, StrategyType::LongCallCondor),
                    same_kind(OptionKind::Put, StrategyType::LongPutCondor),
                ]
                .into_iter()
                .flatten()
                .flat_map(both_orientations)
            })
    }

    fn contract(&self, kind: OptionKind, strike: Decimal) -> Option<&Arc<Contract>> {
        self.by_strike.get(&(kind, strike))
    }
}

/// Strategy from `(contract, signed quantity)` pairs; `None` if degenerate.
fn build(strategy_type: StrategyType, legs: &[(&Arc<Contract>, i64)]) -> Option<Strategy> {
    let legs = legs
        .iter()
        .map(|(contract, quantity)| Leg::new(Arc::clone(contract), *quantity))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    Strategy::new(strategy_type, legs).ok()
}

fn both_orientations(strategy: Strategy) -> [Strategy; 2] {
    let inverted = strategy.inverted();
    [strategy, inverted]
}
