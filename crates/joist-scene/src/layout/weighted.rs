//! Weighted distribution along a stack's main axis.
//!
//! Zero-weight children keep their natural extent; positive weights
//! split whatever remains after naturals and inter-child spacing.

/// One sibling's input to the distribution. `natural` is the measured
/// main-axis extent including margins; `gone` removes the child from
/// both the spacing count and the fixed sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedChild {
    pub weight: f64,
    pub natural: f64,
    pub gone: bool,
}

impl WeightedChild {
    pub fn fixed(natural: f64) -> WeightedChild {
        WeightedChild { weight: 0.0, natural, gone: false }
    }

    pub fn flexible(weight: f64) -> WeightedChild {
        WeightedChild { weight, natural: 0.0, gone: false }
    }
}

/// Computes each child's allocated main-axis extent.
///
/// Gone children receive zero. The flexible budget is the available
/// extent minus fixed naturals minus `spacing` for every consecutive
/// visible pair, clamped at zero; each weighted child receives its
/// proportional share, or zero when the weight sum is zero.
pub fn distribute(children: &[WeightedChild], spacing: f64, available: f64) -> Vec<f64> {
    let visible = children.iter().filter(|c| !c.gone).count();
    let spacing_total = spacing * visible.saturating_sub(1) as f64;

    let fixed_total: f64 = children
        .iter()
        .filter(|c| !c.gone && c.weight <= 0.0)
        .map(|c| c.natural)
        .sum();
    let weight_total: f64 =
        children.iter().filter(|c| !c.gone && c.weight > 0.0).map(|c| c.weight).sum();

    let remaining = (available - fixed_total - spacing_total).max(0.0);

    children
        .iter()
        .map(|c| {
            if c.gone {
                0.0
            } else if c.weight > 0.0 {
                if weight_total > 0.0 { remaining * c.weight / weight_total } else { 0.0 }
            } else {
                c.natural
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_plus_one_flexible() {
        // 200 available, fixed child of 50, spacing 10 for the single
        // visible pair: the weighted child gets 200 - 50 - 10 = 140.
        let children = [WeightedChild::fixed(50.0), WeightedChild::flexible(1.0)];
        assert_eq!(distribute(&children, 10.0, 200.0), vec![50.0, 140.0]);
    }

    #[test]
    fn test_shares_follow_weight_ratio() {
        let children = [
            WeightedChild::flexible(1.0),
            WeightedChild::flexible(3.0),
        ];
        assert_eq!(distribute(&children, 0.0, 400.0), vec![100.0, 300.0]);
    }

    #[test]
    fn test_allocation_is_conserved() {
        let children = [
            WeightedChild::fixed(80.0),
            WeightedChild::flexible(2.0),
            WeightedChild::fixed(20.0),
            WeightedChild::flexible(1.0),
        ];
        let spacing = 8.0;
        let available = 500.0;
        let out = distribute(&children, spacing, available);
        let used: f64 = out.iter().sum::<f64>() + spacing * 3.0;
        assert!((used - available).abs() < 1e-9);
    }

    #[test]
    fn test_overfull_budget_clamps_to_zero() {
        let children = [WeightedChild::fixed(300.0), WeightedChild::flexible(1.0)];
        let out = distribute(&children, 10.0, 200.0);
        assert_eq!(out, vec![300.0, 0.0]);
    }

    #[test]
    fn test_gone_children_receive_nothing_and_free_spacing() {
        let mut middle = WeightedChild::fixed(50.0);
        middle.gone = true;
        let children = [WeightedChild::fixed(50.0), middle, WeightedChild::flexible(1.0)];
        let out = distribute(&children, 10.0, 200.0);
        // Two visible children: one spacing gap, no extent for the gone one.
        assert_eq!(out, vec![50.0, 0.0, 140.0]);
    }

    #[test]
    fn test_zero_weight_sum_gives_zero_to_flexibles() {
        let children = [WeightedChild::fixed(50.0), WeightedChild { weight: 0.0, natural: 0.0, gone: false }];
        let out = distribute(&children, 0.0, 200.0);
        // The zero-size zero-weight sentinel contributes and receives nothing.
        assert_eq!(out, vec![50.0, 0.0]);
    }

    #[test]
    fn test_negative_weights_are_treated_as_fixed() {
        let children = [WeightedChild { weight: -2.0, natural: 40.0, gone: false }];
        assert_eq!(distribute(&children, 0.0, 100.0), vec![40.0]);
    }
}
