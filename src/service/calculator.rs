use crate::config::PricingDefaults;
use crate::error::PricingError;
use crate::models::{
    Averages, CostBuckets, CostItem, FabricReference, MarginField, PriceSuggestion, PricingInputs,
    PricingState, SalesChannel, SizeEntry, SizeMargin,
};
use bigdecimal::BigDecimal;
use std::str::FromStr;

/// 定价计算器 (纯计算，无 IO)
#[derive(Debug, Clone, Default)]
pub struct PricingCalculator {
    defaults: PricingDefaults,
}

impl PricingCalculator {
    pub fn new(defaults: PricingDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &PricingDefaults {
        &self.defaults
    }

    /// 整体重算：尺码成本 -> 平均值 -> 渠道建议价
    pub fn recompute(&self, inputs: &PricingInputs) -> Result<PricingState, PricingError> {
        let waste = inputs
            .waste_percentage
            .unwrap_or(self.defaults.default_waste_percentage);
        let size_margins = compute_size_costs(
            &inputs.sizes,
            inputs.fabric.as_ref(),
            waste,
            &inputs.buckets,
            &self.defaults,
        )?;
        let averages = compute_averages(&size_margins);
        let suggestions = compute_suggestions(averages.cost);

        tracing::debug!(
            "重算完成: {} 个尺码, 平均成本 {:.4}",
            size_margins.len(),
            averages.cost
        );

        Ok(PricingState {
            size_margins,
            averages,
            suggestions,
        })
    }
}

/// 逐尺码成本分解
///
/// 四类成本按总件数平摊（各尺码相同），再加上尺码自身的面料成本。
/// 新行的毛利率取配置默认值。
pub fn compute_size_costs(
    sizes: &[SizeEntry],
    fabric: Option<&FabricReference>,
    waste_percentage: f64,
    buckets: &CostBuckets,
    defaults: &PricingDefaults,
) -> Result<Vec<SizeMargin>, PricingError> {
    // 1. 总件数
    let total_pieces: u64 = sizes.iter().map(|s| u64::from(s.quantity)).sum();
    if total_pieces == 0 {
        return Err(PricingError::validation("no pieces defined"));
    }
    if !waste_percentage.is_finite() || waste_percentage < 0.0 {
        return Err(PricingError::validation(format!(
            "waste percentage must be a non-negative number, got {}",
            waste_percentage
        )));
    }

    // 2. 各类成本的单件分摊
    let pieces = total_pieces as f64;
    let per_piece = |items: &[CostItem]| CostBuckets::bucket_total(items) / pieces;
    let creation_cost = per_piece(buckets.creation.as_slice());
    let supply_cost = per_piece(buckets.supplies.as_slice());
    let labor_cost = per_piece(buckets.labor.as_slice());
    let fixed_cost = per_piece(buckets.fixed.as_slice());

    // 3. 面料单价（缺省走默认价）
    let price_per_kg = resolve_fabric_price(fabric, defaults)?;
    let waste_factor = 1.0 + waste_percentage / 100.0;

    let mut margins = Vec::with_capacity(sizes.len());
    for entry in sizes {
        let weight_grams = resolve_weight(entry, defaults)?;
        let fabric_cost = weight_grams / 1000.0 * price_per_kg * waste_factor;

        // 4. 单件成本
        let cost = fabric_cost + creation_cost + supply_cost + labor_cost + fixed_cost;

        // 5. 默认毛利
        let margin_percent = defaults.default_margin_percent;
        let profit_value = cost * margin_percent / 100.0;

        margins.push(SizeMargin {
            size: entry.size.clone(),
            quantity: entry.quantity,
            fabric_cost,
            creation_cost,
            supply_cost,
            labor_cost,
            fixed_cost,
            cost,
            margin_percent,
            profit_value,
            final_price: cost + profit_value,
        });
    }

    Ok(margins)
}

fn resolve_fabric_price(
    fabric: Option<&FabricReference>,
    defaults: &PricingDefaults,
) -> Result<f64, PricingError> {
    match fabric.and_then(FabricReference::unit_price) {
        Some(price) if !price.is_finite() || price < 0.0 => Err(PricingError::validation(format!(
            "fabric price must be a non-negative number, got {}",
            price
        ))),
        Some(price) => Ok(price),
        None => {
            tracing::debug!(
                "未选择面料, 使用默认单价 {}",
                defaults.default_price_per_kg
            );
            Ok(defaults.default_price_per_kg)
        }
    }
}

fn resolve_weight(entry: &SizeEntry, defaults: &PricingDefaults) -> Result<f64, PricingError> {
    match entry.weight_grams {
        Some(w) if !w.is_finite() || w <= 0.0 => Err(PricingError::validation(format!(
            "weight for size {} must be positive, got {}",
            entry.size, w
        ))),
        Some(w) => Ok(w),
        None => Ok(defaults.default_weight_grams),
    }
}

/// 毛利率/售价联动编辑
///
/// 负值被拒绝，调用方保留原记录。
pub fn apply_margin_edit(
    entry: &SizeMargin,
    field: MarginField,
    value: f64,
) -> Result<SizeMargin, PricingError> {
    if !value.is_finite() {
        return Err(PricingError::validation(format!(
            "{:?} must be a number, got {}",
            field, value
        )));
    }
    if value < 0.0 {
        return Err(PricingError::validation("negative margin/price not allowed"));
    }

    let mut updated = entry.clone();
    match field {
        MarginField::MarginPercent => {
            updated.margin_percent = value;
            updated.profit_value = entry.cost * value / 100.0;
            updated.final_price = entry.cost + updated.profit_value;
        }
        MarginField::FinalPrice => {
            // 低于成本意味着负毛利
            if value < entry.cost {
                return Err(PricingError::validation("negative margin/price not allowed"));
            }
            updated.final_price = value;
            updated.profit_value = value - entry.cost;
            updated.margin_percent = if entry.cost > 0.0 {
                updated.profit_value / entry.cost * 100.0
            } else {
                0.0
            };
        }
    }

    Ok(updated)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

/// 校验外部传入的尺码行：分项非负，成本等于分项之和，售价/利润/毛利率相互一致
pub fn validate_size_margin(m: &SizeMargin) -> Result<(), PricingError> {
    let fields = [
        ("fabricCost", m.fabric_cost),
        ("creationCost", m.creation_cost),
        ("supplyCost", m.supply_cost),
        ("laborCost", m.labor_cost),
        ("fixedCost", m.fixed_cost),
        ("cost", m.cost),
        ("marginPercent", m.margin_percent),
        ("profitValue", m.profit_value),
        ("finalPrice", m.final_price),
    ];
    for (name, v) in fields {
        if !v.is_finite() || v < 0.0 {
            return Err(PricingError::validation(format!(
                "size {}: {} must be a non-negative number, got {}",
                m.size, name, v
            )));
        }
    }

    let components = m.fabric_cost + m.creation_cost + m.supply_cost + m.labor_cost + m.fixed_cost;
    if !close(m.cost, components) {
        return Err(PricingError::validation(format!(
            "size {}: cost {} does not match its components {}",
            m.size, m.cost, components
        )));
    }
    if !close(m.final_price, m.cost + m.profit_value) {
        return Err(PricingError::validation(format!(
            "size {}: finalPrice {} does not equal cost + profitValue",
            m.size, m.final_price
        )));
    }
    if m.cost > 0.0 && !close(m.margin_percent, m.profit_value / m.cost * 100.0) {
        return Err(PricingError::validation(format!(
            "size {}: marginPercent {} does not match profitValue / cost",
            m.size, m.margin_percent
        )));
    }

    Ok(())
}

/// 平均值；空列表返回全零
pub fn compute_averages(margins: &[SizeMargin]) -> Averages {
    if margins.is_empty() {
        return Averages::default();
    }

    let n = margins.len() as f64;
    let mean = |f: fn(&SizeMargin) -> f64| margins.iter().map(f).sum::<f64>() / n;

    Averages {
        cost: mean(|m| m.cost),
        profit_value: mean(|m| m.profit_value),
        final_price: mean(|m| m.final_price),
        margin_percent: mean(|m| m.margin_percent),
    }
}

/// 三个渠道参考价
pub fn compute_suggestions(average_cost: f64) -> Vec<PriceSuggestion> {
    SalesChannel::ALL
        .iter()
        .map(|&channel| {
            let margin = channel.margin_percent();
            PriceSuggestion {
                channel,
                name: channel.label().to_string(),
                margin,
                price: average_cost * (1.0 + margin / 100.0),
                profit: average_cost * margin / 100.0,
            }
        })
        .collect()
}

impl PricingState {
    /// 编辑某个尺码的毛利率或售价，并刷新平均值与建议价。失败时状态不变。
    pub fn apply_edit(
        &mut self,
        size: &str,
        field: MarginField,
        value: f64,
    ) -> Result<(), PricingError> {
        let Some(idx) = self.size_margins.iter().position(|m| m.size == size) else {
            return Err(PricingError::validation(format!("unknown size {}", size)));
        };

        let updated = match apply_margin_edit(&self.size_margins[idx], field, value) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("尺码 {} 编辑被拒绝 ({:?} = {}): {}", size, field, value, e);
                return Err(e);
            }
        };

        self.size_margins[idx] = updated;
        self.refresh_derived();
        Ok(())
    }

    /// 由外部传入的尺码行重建状态，任一行不一致即拒绝
    pub fn from_size_margins(size_margins: Vec<SizeMargin>) -> Result<Self, PricingError> {
        for m in &size_margins {
            validate_size_margin(m)?;
        }
        let mut state = Self {
            size_margins,
            ..Self::default()
        };
        state.refresh_derived();
        Ok(state)
    }

    /// 从当前尺码行重新派生平均值与建议价
    pub fn refresh_derived(&mut self) {
        self.averages = compute_averages(&self.size_margins);
        self.suggestions = compute_suggestions(self.averages.cost);
    }
}

/// 展示用两位小数
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 两位小数金额 (持久化/导出)
pub fn to_money(value: f64) -> BigDecimal {
    let v = if value.is_finite() { value } else { 0.0 };
    BigDecimal::from_str(&format!("{:.2}", v)).unwrap_or_default()
}
