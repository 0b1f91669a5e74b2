//! Variant combination builder.
//!
//! Holds the axes being edited (e.g. "Size" with S/M/L) and the generated
//! combinations. Every edit to the axes clears the combinations, so a
//! submitted set always matches the axes it was generated from.

use thiserror::Error;

use crate::models::OptionMap;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("Please fill all variant names and at least one option.")]
    NoValidAxes,
    #[error("Please fill all price and stock fields before submitting.")]
    IncompleteCombinations,
    #[error("Variant name \"{0}\" is used more than once")]
    DuplicateAxis(String),
    #[error("No combinations generated yet")]
    NotGenerated,
    #[error("{0} must be a non-negative number")]
    InvalidAmount(&'static str),
    #[error("No {what} at index {index}")]
    OutOfRange { what: &'static str, index: usize },
}

pub type BuilderResult<T> = Result<T, BuilderError>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantAxis {
    pub name: String,
    pub options: Vec<String>,
}

impl VariantAxis {
    pub fn new(name: impl Into<String>, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Trimmed name and non-blank trimmed options, or `None` if the axis
    /// cannot contribute to combinations.
    fn usable(&self) -> Option<(&str, Vec<&str>)> {
        let name = self.name.trim();
        let options: Vec<&str> = self
            .options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect();
        if name.is_empty() || options.is_empty() {
            None
        } else {
            Some((name, options))
        }
    }
}

/// One row of the generated table: a full choice of value per axis plus the
/// data the user fills in for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub options: OptionMap,
    pub image_url: String,
    pub price: f64,
    pub stock: i64,
}

impl Combination {
    fn new(options: OptionMap) -> Self {
        Self {
            options,
            image_url: String::new(),
            price: 0.0,
            stock: 0,
        }
    }

    fn is_complete(&self) -> bool {
        self.price > 0.0 && self.stock > 0
    }
}

/// Cartesian product of `lists`, preserving list order and element order.
/// One empty list yields no rows; no lists yields one empty row.
pub fn cartesian_product<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    lists.iter().fold(vec![Vec::new()], |acc, list| {
        acc.iter()
            .flat_map(|prefix| {
                list.iter().map(move |item| {
                    let mut row = prefix.clone();
                    row.push(item.clone());
                    row
                })
            })
            .collect()
    })
}

/// Combinations for `axes`, skipping blank axes and blank options.
pub fn combinations_for(axes: &[VariantAxis]) -> BuilderResult<Vec<Combination>> {
    let usable: Vec<(&str, Vec<&str>)> = axes.iter().filter_map(VariantAxis::usable).collect();
    if usable.is_empty() {
        return Err(BuilderError::NoValidAxes);
    }

    let names: Vec<&str> = usable.iter().map(|(name, _)| *name).collect();
    // Axis names key the option map, so a repeat would overwrite a value
    if let Some((_, dup)) = names
        .iter()
        .enumerate()
        .find(|&(i, name)| names[..i].contains(name))
    {
        return Err(BuilderError::DuplicateAxis(dup.to_string()));
    }
    let matrix: Vec<Vec<&str>> = usable.into_iter().map(|(_, options)| options).collect();

    Ok(cartesian_product(&matrix)
        .into_iter()
        .map(|values| Combination::new(names.iter().copied().zip(values).collect()))
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantBuilder {
    axes: Vec<VariantAxis>,
    combinations: Vec<Combination>,
}

impl Default for VariantBuilder {
    /// Starts with one empty axis holding one empty option, ready for input.
    fn default() -> Self {
        Self {
            axes: vec![VariantAxis::new("", [""])],
            combinations: Vec::new(),
        }
    }
}

impl VariantBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axes(axes: Vec<VariantAxis>) -> Self {
        Self {
            axes,
            combinations: Vec::new(),
        }
    }

    pub fn axes(&self) -> &[VariantAxis] {
        &self.axes
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    fn axis_mut(&mut self, index: usize) -> BuilderResult<&mut VariantAxis> {
        self.axes
            .get_mut(index)
            .ok_or(BuilderError::OutOfRange { what: "axis", index })
    }

    fn edited(&mut self) {
        self.combinations.clear();
    }

    // ---- axis edits (each clears generated combinations) ----

    pub fn add_axis(&mut self) {
        self.axes.push(VariantAxis::new("", [""]));
        self.edited();
    }

    pub fn remove_axis(&mut self, index: usize) -> BuilderResult<()> {
        if index >= self.axes.len() {
            return Err(BuilderError::OutOfRange { what: "axis", index });
        }
        self.axes.remove(index);
        self.edited();
        Ok(())
    }

    pub fn rename_axis(&mut self, index: usize, name: impl Into<String>) -> BuilderResult<()> {
        self.axis_mut(index)?.name = name.into();
        self.edited();
        Ok(())
    }

    pub fn add_option(&mut self, axis: usize) -> BuilderResult<()> {
        self.axis_mut(axis)?.options.push(String::new());
        self.edited();
        Ok(())
    }

    pub fn set_option(
        &mut self,
        axis: usize,
        option: usize,
        value: impl Into<String>,
    ) -> BuilderResult<()> {
        let slot = self
            .axis_mut(axis)?
            .options
            .get_mut(option)
            .ok_or(BuilderError::OutOfRange { what: "option", index: option })?;
        *slot = value.into();
        self.edited();
        Ok(())
    }

    pub fn remove_option(&mut self, axis: usize, option: usize) -> BuilderResult<()> {
        let options = &mut self.axis_mut(axis)?.options;
        if option >= options.len() {
            return Err(BuilderError::OutOfRange { what: "option", index: option });
        }
        options.remove(option);
        self.edited();
        Ok(())
    }

    // ---- generation and per-combination data ----

    /// Regenerate the combination table from the current axes. Existing
    /// combinations are discarded even when generation fails.
    pub fn generate(&mut self) -> BuilderResult<&[Combination]> {
        self.combinations.clear();
        self.combinations = combinations_for(&self.axes)?;
        Ok(&self.combinations)
    }

    fn combination_mut(&mut self, index: usize) -> BuilderResult<&mut Combination> {
        self.combinations
            .get_mut(index)
            .ok_or(BuilderError::OutOfRange { what: "combination", index })
    }

    pub fn set_image_url(&mut self, index: usize, url: impl Into<String>) -> BuilderResult<()> {
        self.combination_mut(index)?.image_url = url.into();
        Ok(())
    }

    pub fn set_price(&mut self, index: usize, price: f64) -> BuilderResult<()> {
        if !price.is_finite() || price < 0.0 {
            return Err(BuilderError::InvalidAmount("Price"));
        }
        self.combination_mut(index)?.price = price;
        Ok(())
    }

    pub fn set_stock(&mut self, index: usize, stock: i64) -> BuilderResult<()> {
        if stock < 0 {
            return Err(BuilderError::InvalidAmount("Stock"));
        }
        self.combination_mut(index)?.stock = stock;
        Ok(())
    }

    /// The generated combinations, once every one has a price and stock.
    pub fn submit(&self) -> BuilderResult<Vec<Combination>> {
        if self.combinations.is_empty() {
            return Err(BuilderError::NotGenerated);
        }
        if !self.combinations.iter().all(Combination::is_complete) {
            return Err(BuilderError::IncompleteCombinations);
        }
        Ok(self.combinations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_color() -> VariantBuilder {
        VariantBuilder::with_axes(vec![
            VariantAxis::new("Size", ["S", "M", "L"]),
            VariantAxis::new("Color", ["Red", "Blue"]),
        ])
    }

    #[test]
    fn count_is_product_of_option_counts() {
        let mut builder = size_color();
        let combos = builder.generate().unwrap();
        assert_eq!(combos.len(), 6);
        for combo in combos {
            assert_eq!(combo.options.len(), 2);
            assert!(combo.options.get("Size").is_some());
            assert!(combo.options.get("Color").is_some());
            assert_eq!(combo.price, 0.0);
            assert_eq!(combo.stock, 0);
            assert!(combo.image_url.is_empty());
        }

        let mut builder = VariantBuilder::with_axes(vec![
            VariantAxis::new("A", ["1", "2"]),
            VariantAxis::new("B", ["1", "2", "3"]),
            VariantAxis::new("C", ["1", "2"]),
            VariantAxis::new("D", ["x"]),
        ]);
        assert_eq!(builder.generate().unwrap().len(), 12);
    }

    #[test]
    fn combinations_follow_axis_and_option_order() {
        let mut builder = size_color();
        let described: Vec<String> = builder
            .generate()
            .unwrap()
            .iter()
            .map(|c| c.options.describe())
            .collect();
        assert_eq!(
            described,
            vec![
                "Size: S, Color: Red",
                "Size: S, Color: Blue",
                "Size: M, Color: Red",
                "Size: M, Color: Blue",
                "Size: L, Color: Red",
                "Size: L, Color: Blue",
            ]
        );
    }

    #[test]
    fn blank_axes_and_options_are_skipped() {
        let mut builder = VariantBuilder::with_axes(vec![
            VariantAxis::new("  Size ", [" S ", "", "  ", "M"]),
            VariantAxis::new("", ["orphan"]),
            VariantAxis::new("Material", ["", " "]),
        ]);
        let combos = builder.generate().unwrap();
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[0].options.describe(), "Size: S");
        assert_eq!(combos[1].options.describe(), "Size: M");
    }

    #[test]
    fn no_usable_axes_is_an_error() {
        let mut builder = VariantBuilder::new();
        assert_eq!(builder.generate().unwrap_err(), BuilderError::NoValidAxes);
        assert!(builder.combinations().is_empty());
    }

    #[test]
    fn repeated_axis_name_is_an_error() {
        let mut builder = VariantBuilder::with_axes(vec![
            VariantAxis::new("Size", ["S", "M"]),
            VariantAxis::new(" Size ", ["L"]),
        ]);
        assert_eq!(
            builder.generate().unwrap_err(),
            BuilderError::DuplicateAxis("Size".into())
        );
        assert!(builder.combinations().is_empty());

        // A blank duplicate is skipped before the check
        let mut builder = VariantBuilder::with_axes(vec![
            VariantAxis::new("Size", ["S", "M"]),
            VariantAxis::new("Size", [" "]),
        ]);
        assert_eq!(builder.generate().unwrap().len(), 2);
    }

    #[test]
    fn any_axis_edit_clears_combinations() {
        type Edit = fn(&mut VariantBuilder);
        let edits: [Edit; 6] = [
            |b| b.add_axis(),
            |b| b.remove_axis(1).unwrap(),
            |b| b.rename_axis(0, "Fit").unwrap(),
            |b| b.add_option(0).unwrap(),
            |b| b.set_option(1, 0, "Green").unwrap(),
            |b| b.remove_option(0, 2).unwrap(),
        ];

        for edit in edits {
            let mut builder = size_color();
            builder.generate().unwrap();
            assert!(!builder.combinations().is_empty());
            edit(&mut builder);
            assert!(builder.combinations().is_empty());
        }
    }

    #[test]
    fn submit_requires_price_and_stock_everywhere() {
        let mut builder = VariantBuilder::with_axes(vec![VariantAxis::new("Size", ["S", "M"])]);
        assert_eq!(builder.submit().unwrap_err(), BuilderError::NotGenerated);

        builder.generate().unwrap();
        builder.set_price(0, 9.5).unwrap();
        builder.set_stock(0, 4).unwrap();
        assert_eq!(builder.submit().unwrap_err(), BuilderError::IncompleteCombinations);

        builder.set_price(1, 11.0).unwrap();
        builder.set_stock(1, 2).unwrap();
        builder.set_image_url(1, "https://cdn.example.com/m.png").unwrap();
        let submitted = builder.submit().unwrap();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[1].image_url, "https://cdn.example.com/m.png");
    }

    #[test]
    fn invalid_amounts_and_indexes_are_rejected() {
        let mut builder = VariantBuilder::with_axes(vec![VariantAxis::new("Size", ["S"])]);
        builder.generate().unwrap();
        assert_eq!(builder.set_price(0, -1.0).unwrap_err(), BuilderError::InvalidAmount("Price"));
        assert!(builder.set_price(0, f64::INFINITY).is_err());
        assert_eq!(builder.set_stock(0, -3).unwrap_err(), BuilderError::InvalidAmount("Stock"));
        assert!(matches!(
            builder.set_stock(5, 1),
            Err(BuilderError::OutOfRange { what: "combination", index: 5 })
        ));
        assert!(builder.remove_axis(3).is_err());
        // failed edits leave the table alone
        assert_eq!(builder.combinations().len(), 1);
    }

    #[test]
    fn cartesian_product_edges() {
        let empty: Vec<Vec<u8>> = vec![];
        assert_eq!(cartesian_product(&empty), vec![Vec::<u8>::new()]);
        assert!(cartesian_product(&[vec![1, 2], vec![]]).is_empty());
        assert_eq!(
            cartesian_product(&[vec![1, 2], vec![3]]),
            vec![vec![1, 3], vec![2, 3]]
        );
    }
}
