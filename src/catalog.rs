//! Read-only menu catalog.
//!
//! Callers resolve catalog entries into [`NewLine`]s before handing them to
//! the engine; the engine itself never looks anything up here.

use crate::Amount;
use crate::model::{Customizations, NewLine, SizeCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diet {
    Veg,
    NonVeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topping {
    pub id: &'static str,
    pub name: &'static str,
    pub price: Amount,
    pub category: Option<Diet>,
}

/// Price per size code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePrices {
    pub regular: Amount,
    pub medium: Amount,
    pub large: Amount,
}

impl SizePrices {
    const fn whole(regular: i64, medium: i64, large: i64) -> Self {
        Self {
            regular: Amount::from_whole(regular),
            medium: Amount::from_whole(medium),
            large: Amount::from_whole(large),
        }
    }

    pub fn get(&self, size: SizeCode) -> Amount {
        match size {
            SizeCode::Regular => self.regular,
            SizeCode::Medium => self.medium,
            SizeCode::Large => self.large,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pizza {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub prices: SizePrices,
    pub default_toppings: &'static [&'static str],
    pub image: &'static str,
    pub is_veg: bool,
    pub rating: Option<f32>,
}

impl Pizza {
    /// Every pizza offers the full topping list.
    pub fn available_toppings(&self) -> &'static [Topping] {
        TOPPINGS
    }

    pub fn build(&self) -> PizzaBuild {
        PizzaBuild::new(*self)
    }
}

/// A flat-priced side or beverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: Amount,
    pub image: &'static str,
    pub category: &'static str,
    pub is_veg: bool,
}

impl MenuItem {
    pub fn to_line(&self, quantity: u32) -> NewLine {
        NewLine::new(self.id, self.name, self.price)
            .quantity(quantity)
            .image(self.image)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deal {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub price: Amount,
    pub savings: Option<Amount>,
    pub applicable_categories: &'static [&'static str],
    pub image: Option<&'static str>,
}

/// Anything a category can list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry {
    Pizza(&'static Pizza),
    Item(&'static MenuItem),
}

impl Entry {
    pub fn id(&self) -> &'static str {
        match self {
            Entry::Pizza(pizza) => pizza.id,
            Entry::Item(item) => item.id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Entry::Pizza(pizza) => pizza.name,
            Entry::Item(item) => item.name,
        }
    }

    pub fn is_veg(&self) -> bool {
        match self {
            Entry::Pizza(pizza) => pizza.is_veg,
            Entry::Item(item) => item.is_veg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

impl Category {
    pub fn entries(&self) -> Vec<Entry> {
        match self.id {
            "pizzas" => PIZZAS.iter().map(Entry::Pizza).collect(),
            id => SIDES
                .iter()
                .chain(BEVERAGES)
                .filter(|item| item.category == id)
                .map(Entry::Item)
                .collect(),
        }
    }
}

const fn topping(id: &'static str, name: &'static str, price: i64, diet: Diet) -> Topping {
    Topping {
        id,
        name,
        price: Amount::from_whole(price),
        category: Some(diet),
    }
}

pub static TOPPINGS: &[Topping] = &[
    topping("pepperoni", "Pepperoni", 49, Diet::NonVeg),
    topping("mushrooms", "Mushrooms", 29, Diet::Veg),
    topping("onions", "Onions", 19, Diet::Veg),
    topping("bell-peppers", "Bell Peppers", 29, Diet::Veg),
    topping("olives", "Olives", 29, Diet::Veg),
    topping("extra-cheese", "Extra Cheese", 59, Diet::Veg),
    topping("jalapenos", "Jalapeños", 29, Diet::Veg),
    topping("tomatoes", "Fresh Tomatoes", 19, Diet::Veg),
    topping("corn", "Sweet Corn", 25, Diet::Veg),
    topping("paneer", "Paneer", 69, Diet::Veg),
    topping("chicken", "Chicken", 79, Diet::NonVeg),
    topping("basil", "Fresh Basil", 15, Diet::Veg),
];

pub static PIZZAS: &[Pizza] = &[
    Pizza {
        id: "margherita",
        name: "Classic Margherita",
        description: "Tomato sauce, fresh mozzarella, basil",
        prices: SizePrices::whole(149, 249, 399),
        default_toppings: &["extra-cheese", "basil"],
        image: "pizza-margherita.jpg",
        is_veg: true,
        rating: Some(4.5),
    },
    Pizza {
        id: "pepperoni",
        name: "Pepperoni Classic",
        description: "Loaded with pepperoni, mozzarella & Italian herbs",
        prices: SizePrices::whole(199, 329, 499),
        default_toppings: &["pepperoni", "extra-cheese"],
        image: "pizza-pepperoni.jpg",
        is_veg: false,
        rating: Some(4.7),
    },
    Pizza {
        id: "veggie-supreme",
        name: "Veggie Supreme",
        description: "Bell peppers, mushrooms, onions, olives & corn",
        prices: SizePrices::whole(179, 299, 449),
        default_toppings: &["bell-peppers", "mushrooms", "onions", "olives", "corn"],
        image: "pizza-veggie.jpg",
        is_veg: true,
        rating: Some(4.6),
    },
    Pizza {
        id: "paneer-tikka",
        name: "Paneer Tikka",
        description: "Spicy paneer tikka, onions, bell peppers & mint mayo",
        prices: SizePrices::whole(189, 319, 479),
        default_toppings: &["paneer", "onions", "bell-peppers"],
        image: "pizza-veggie.jpg",
        is_veg: true,
        rating: Some(4.8),
    },
];

pub static SIDES: &[MenuItem] = &[
    MenuItem {
        id: "garlic-bread",
        name: "Garlic Breadsticks",
        description: "6 pieces with marinara dip",
        price: Amount::from_whole(129),
        image: "pizza-margherita.jpg",
        category: "sides",
        is_veg: true,
    },
    MenuItem {
        id: "chicken-wings",
        name: "Chicken Wings",
        description: "8 spicy BBQ wings",
        price: Amount::from_whole(249),
        image: "pizza-pepperoni.jpg",
        category: "sides",
        is_veg: false,
    },
    MenuItem {
        id: "cheese-dip",
        name: "Cheese Dip",
        description: "Creamy cheese sauce",
        price: Amount::from_whole(49),
        image: "pizza-margherita.jpg",
        category: "sides",
        is_veg: true,
    },
];

pub static BEVERAGES: &[MenuItem] = &[
    MenuItem {
        id: "coke",
        name: "Coca Cola",
        description: "750ml bottle",
        price: Amount::from_whole(60),
        image: "pizza-margherita.jpg",
        category: "beverages",
        is_veg: true,
    },
    MenuItem {
        id: "sprite",
        name: "Sprite",
        description: "750ml bottle",
        price: Amount::from_whole(60),
        image: "pizza-margherita.jpg",
        category: "beverages",
        is_veg: true,
    },
];

pub static DEALS: &[Deal] = &[
    Deal {
        id: "deal-two-medium",
        title: "2 Medium Pizzas + 1 Side",
        description: "Get any 2 medium pizzas and 1 side",
        price: Amount::from_whole(599),
        savings: Some(Amount::from_whole(100)),
        applicable_categories: &["pizzas", "sides"],
        image: Some("pizza-pepperoni.jpg"),
    },
    Deal {
        id: "deal-large-combo",
        title: "Large Pizza Meal",
        description: "1 Large pizza + 2 beverages + garlic bread",
        price: Amount::from_whole(549),
        savings: Some(Amount::from_whole(80)),
        applicable_categories: &["pizzas", "sides", "beverages"],
        image: Some("pizza-veggie.jpg"),
    },
];

pub static CATEGORIES: &[Category] = &[
    Category {
        id: "pizzas",
        name: "Pizzas",
        icon: "pizza",
    },
    Category {
        id: "sides",
        name: "Sides",
        icon: "utensils",
    },
    Category {
        id: "beverages",
        name: "Beverages",
        icon: "cup-soda",
    },
];

pub fn pizza(id: &str) -> Option<&'static Pizza> {
    PIZZAS.iter().find(|pizza| pizza.id == id)
}

pub fn topping_by_id(id: &str) -> Option<&'static Topping> {
    TOPPINGS.iter().find(|topping| topping.id == id)
}

/// Sides and beverages.
pub fn menu_item(id: &str) -> Option<&'static MenuItem> {
    SIDES.iter().chain(BEVERAGES).find(|item| item.id == id)
}

pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.id == id)
}

/// Surcharge for a topping selection; unknown ids cost nothing.
pub fn toppings_price<'a>(toppings: impl IntoIterator<Item = &'a str>) -> Amount {
    toppings
        .into_iter()
        .filter_map(topping_by_id)
        .map(|topping| topping.price)
        .sum()
}

/// A pizza being customized before it goes into the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct PizzaBuild {
    pizza: Pizza,
    size: SizeCode,
    toppings: Vec<String>,
    quantity: u32,
}

impl PizzaBuild {
    /// Medium size with the pizza's default toppings.
    pub fn new(pizza: Pizza) -> Self {
        Self {
            pizza,
            size: SizeCode::default(),
            toppings: pizza.default_toppings.iter().map(|t| t.to_string()).collect(),
            quantity: 1,
        }
    }

    pub fn size(mut self, size: SizeCode) -> Self {
        self.size = size;
        self
    }

    /// Quantity is at least 1.
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Add the topping if absent, otherwise remove it.
    pub fn toggle_topping(mut self, id: &str) -> Self {
        match self.toppings.iter().position(|t| t == id) {
            Some(idx) => {
                self.toppings.remove(idx);
            }
            None => self.toppings.push(id.to_string()),
        }
        self
    }

    pub fn toppings(&self) -> &[String] {
        &self.toppings
    }

    /// Size price plus toppings surcharge.
    pub fn unit_price(&self) -> Amount {
        self.pizza.prices.get(self.size) + toppings_price(self.toppings.iter().map(String::as_str))
    }

    /// Unit price times quantity, as shown while building.
    pub fn total_price(&self) -> Amount {
        self.unit_price().times(self.quantity)
    }

    pub fn to_line(&self) -> NewLine {
        NewLine::new(self.pizza.id, self.pizza.name, self.unit_price())
            .quantity(self.quantity)
            .size(self.size)
            .customizations(Customizations::with_toppings(self.toppings.iter().cloned()))
            .image(self.pizza.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups() {
        assert_eq!(pizza("margherita").unwrap().name, "Classic Margherita");
        assert!(pizza("hawaiian").is_none());
        assert_eq!(topping_by_id("paneer").unwrap().price, Amount::from_whole(69));
        assert_eq!(menu_item("coke").unwrap().category, "beverages");
        assert_eq!(menu_item("cheese-dip").unwrap().category, "sides");
        assert!(category("desserts").is_none());
    }

    #[test]
    fn topping_ids_are_unique() {
        for (i, a) in TOPPINGS.iter().enumerate() {
            assert!(TOPPINGS.iter().skip(i + 1).all(|b| b.id != a.id), "{}", a.id);
        }
    }

    #[test]
    fn default_toppings_exist() {
        for pizza in PIZZAS {
            for id in pizza.default_toppings {
                assert!(topping_by_id(id).is_some(), "{} lists {id}", pizza.id);
            }
        }
    }

    #[test]
    fn categories_list_their_entries() {
        let pizzas = category("pizzas").unwrap().entries();
        let sides = category("sides").unwrap().entries();
        let beverages = category("beverages").unwrap().entries();

        assert_eq!(pizzas.len(), 4);
        assert_eq!(sides.len(), 3);
        assert_eq!(beverages.len(), 2);
        assert!(matches!(pizzas[0], Entry::Pizza(p) if p.id == "margherita"));
        assert_eq!(beverages[1].name(), "Sprite");
        assert!(!sides[1].is_veg());
    }

    #[test]
    fn toppings_price_ignores_unknown_ids() {
        assert_eq!(toppings_price(["basil", "truffle"]), Amount::from_whole(15));
        assert_eq!(toppings_price([] as [&str; 0]), Amount::ZERO);
    }

    #[test]
    fn build_starts_medium_with_defaults() {
        let build = pizza("margherita").unwrap().build();
        assert_eq!(build.toppings(), ["extra-cheese", "basil"]);
        // 249 + 59 + 15
        assert_eq!(build.unit_price(), Amount::from_whole(323));
    }

    #[test]
    fn build_size_and_toggles() {
        let build = pizza("margherita")
            .unwrap()
            .build()
            .size(SizeCode::Large)
            .toggle_topping("extra-cheese")
            .toggle_topping("corn")
            .quantity(2);

        assert_eq!(build.toppings(), ["basil", "corn"]);
        // 399 + 15 + 25
        assert_eq!(build.unit_price(), Amount::from_whole(439));
        assert_eq!(build.total_price(), Amount::from_whole(878));
    }

    #[test]
    fn build_to_line_records_customization() {
        let line = pizza("pepperoni")
            .unwrap()
            .build()
            .size(SizeCode::Regular)
            .to_line();

        assert_eq!(line.item_id.as_str(), "pepperoni");
        assert_eq!(line.price, Amount::from_whole(199 + 49 + 59));
        assert_eq!(line.size, Some(SizeCode::Regular));
        assert_eq!(line.quantity, 1);
        assert_eq!(
            line.customizations.unwrap().toppings,
            ["pepperoni", "extra-cheese"]
        );
        assert_eq!(line.image, "pizza-pepperoni.jpg");
    }

    #[test]
    fn menu_item_to_line() {
        let line = menu_item("garlic-bread").unwrap().to_line(2);
        assert_eq!(line.price, Amount::from_whole(129));
        assert_eq!(line.quantity, 2);
        assert!(line.size.is_none());
        assert!(line.customizations.is_none());
    }

    #[test]
    fn deals_carry_savings() {
        let deal = DEALS.iter().find(|d| d.id == "deal-large-combo").unwrap();
        assert_eq!(deal.savings, Some(Amount::from_whole(80)));
        assert_eq!(deal.applicable_categories.len(), 3);
    }
}
