//! Pool state files and quote rendering

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pmm::{
    BigDecimal, DecimalContext, PmmError, PmmPool, RawPmmState, Regime, SellQuote, TokenDecimals,
};
use serde::Deserialize;

/// Raw pool state captured from chain, plus the pair's token decimals
#[derive(Debug, Clone, Deserialize)]
pub struct PoolStateFile {
    pub name: Option<String>,
    pub decimals: TokenDecimals,
    pub state: RawPmmState,
}

impl PoolStateFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pool state file {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid pool state file {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse pool state TOML")
    }
}

/// One sale and its outcome
#[derive(Debug, Clone)]
pub struct TradeLine {
    pub amount: BigDecimal,
    pub outcome: pmm::Result<SellQuote>,
}

/// Mid price and both sale directions for one pool
#[derive(Debug, Clone)]
pub struct QuoteReport {
    pub name: String,
    pub regime: Regime,
    pub mid_price: pmm::Result<BigDecimal>,
    pub sell_base: TradeLine,
    pub sell_quote: TradeLine,
}

/// Rendering options
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub fixed_output: bool,
    pub detailed: bool,
}

impl QuoteReport {
    pub fn build(
        pool: &impl PmmPool,
        name: &str,
        base_amount: BigDecimal,
        quote_amount: BigDecimal,
    ) -> Self {
        let sell_base = TradeLine {
            outcome: pool.sell_base_detailed(&base_amount),
            amount: base_amount,
        };
        let sell_quote = TradeLine {
            outcome: pool.sell_quote_detailed(&quote_amount),
            amount: quote_amount,
        };
        Self {
            name: name.to_string(),
            regime: pool.regime(),
            mid_price: pool.mid_price(),
            sell_base,
            sell_quote,
        }
    }

    pub fn render(
        &self,
        ctx: &DecimalContext,
        decimals: &TokenDecimals,
        options: RenderOptions,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "pool: {} ({})", self.name, self.regime);

        match &self.mid_price {
            Ok(price) => {
                let _ = writeln!(out, "mid price: {}", ctx.format(price));
            }
            Err(e) => {
                let _ = writeln!(out, "mid price: unavailable ({})", e);
            }
        }

        let amount = |value: &BigDecimal, places: u8| {
            if options.fixed_output {
                ctx.format_fixed(value, places as u32)
            } else {
                ctx.format(value)
            }
        };

        for (line, sold, received, places) in [
            (&self.sell_base, "base", "quote", decimals.quote),
            (&self.sell_quote, "quote", "base", decimals.base),
        ] {
            let sold_amount = ctx.format(&line.amount);
            match &line.outcome {
                Ok(quote) => {
                    let _ = writeln!(
                        out,
                        "sell {} {} -> {} {}",
                        sold_amount,
                        sold,
                        amount(&quote.net, places),
                        received
                    );
                    if options.detailed {
                        let _ = writeln!(
                            out,
                            "  gross {} | mt fee {} | lp fee {} | crossed pivot: {}",
                            amount(&quote.gross, places),
                            amount(&quote.mt_fee, places),
                            amount(&quote.lp_fee, places),
                            quote.crossed_pivot
                        );
                    }
                }
                Err(e) => {
                    let zero = amount(&BigDecimal::from(0_i64), places);
                    let _ = writeln!(
                        out,
                        "sell {} {} -> {} {} (no trade: {})",
                        sold_amount, sold, zero, received, e
                    );
                }
            }
        }

        out
    }

    /// Failures that made a direction unquotable
    pub fn errors(&self) -> Vec<&PmmError> {
        [&self.sell_base.outcome, &self.sell_quote.outcome]
            .into_iter()
            .filter_map(|outcome| outcome.as_ref().err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmm::{PmmEngine, PmmPoolView};
    use std::str::FromStr;

    const EXAMPLE_POOL: &str = include_str!("../data/example_pool.toml");

    fn d(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_example_pool() {
        let file = PoolStateFile::parse(EXAMPLE_POOL).unwrap();
        assert_eq!(file.name.as_deref(), Some("WETH/USDC"));
        assert_eq!(file.decimals, TokenDecimals { base: 18, quote: 6 });
        assert_eq!(file.state.r, 1);
    }

    #[test]
    fn test_render_example_pool() {
        let file = PoolStateFile::parse(EXAMPLE_POOL).unwrap();
        let snapshot = file.state.normalize(&file.decimals).unwrap();
        let engine = PmmEngine::default();
        let pool = PmmPoolView::new(&engine, &snapshot);

        let report = QuoteReport::build(&pool, "WETH/USDC", d("1"), d("1000"));
        assert!(report.errors().is_empty());

        let text = report.render(
            engine.context(),
            &file.decimals,
            RenderOptions {
                fixed_output: true,
                detailed: true,
            },
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "pool: WETH/USDC (above-pivot)");
        assert!(lines[1].starts_with("mid price: 2505.07601265177022752780328537904295"));
        assert_eq!(lines[2], "sell 1 base -> 2496.051755 quote");
        assert_eq!(
            lines[3],
            "  gross 2504.818620 | mt fee 1.252409 | lp fee 7.514456 | crossed pivot: false"
        );
        assert_eq!(lines[4], "sell 1000 quote -> 0.397775982851352745 base");
    }

    #[test]
    fn test_render_reports_failures_as_zero() {
        let mut file = PoolStateFile::parse(EXAMPLE_POOL).unwrap();
        file.state.q0 = "0".to_string();
        let snapshot = file.state.normalize(&file.decimals).unwrap();
        let engine = PmmEngine::default();
        let pool = PmmPoolView::new(&engine, &snapshot);

        let report = QuoteReport::build(&pool, "broken", d("1"), d("1"));
        assert_eq!(report.errors(), vec![&PmmError::TargetIsZero, &PmmError::TargetIsZero]);

        let text = report.render(
            engine.context(),
            &file.decimals,
            RenderOptions {
                fixed_output: true,
                detailed: false,
            },
        );
        assert!(text.contains("sell 1 base -> 0.000000 quote (no trade: Target reserve is zero or negative)"));
    }
}
