use crustops_core::ServiceError;

use super::pizza::CreatePizzaInput;
use super::ShopService;

use crate::model::Pizza;

/// The launch menu.
fn launch_pizzas() -> Vec<CreatePizzaInput> {
    fn pizza(name: &str, description: &str, tags: &[&str], price: &str) -> CreatePizzaInput {
        CreatePizzaInput {
            name: name.into(),
            description: description.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image_url: None,
            active: true,
            sold_out: false,
            price: price.into(),
        }
    }

    vec![
        pizza(
            "Truffle Shuffle",
            "White pie with mozzarella, ricotta, roasted mushrooms, truffle oil \
             and a parmesan crust.",
            &["veg", "white pie", "rich"],
            "24.00",
        ),
        pizza(
            "CrustGPT",
            "Pesto base, fresh mozzarella, cherry tomatoes, basil and a drizzle \
             of balsamic. Generated nightly, always delicious.",
            &["veg", "pesto", "fresh"],
            "23.00",
        ),
        pizza(
            "Señor Crustobal",
            "Chorizo, roasted corn, pickled jalapeños, cotija and lime crema on \
             a smoky tomato base.",
            &["fusion", "spicy", "loaded"],
            "25.00",
        ),
        pizza(
            "Papa Crusto",
            "Spiced potato, caramelized onion, green chutney and paneer. A \
             tribute to the OG street flavors.",
            &["fusion", "spicy", "veg"],
            "24.00",
        ),
        pizza(
            "George Crustanza",
            "Classic margherita with double basil. It's not a lie if you \
             believe it's the best pie in town.",
            &["veg", "classic", "fresh"],
            "23.00",
        ),
    ]
}

impl ShopService {
    /// Seed the launch menu and default settings. A no-op when pizzas
    /// already exist, so it is safe to run on every startup.
    pub fn seed(&self) -> Result<(), ServiceError> {
        let existing: Vec<Pizza> = self.list_records("pizzas", &[], "create_at ASC", 1, 0)?;
        if !existing.is_empty() {
            tracing::debug!("seed skipped, menu already present");
            return Ok(());
        }

        for input in launch_pizzas() {
            let pizza = self.create_pizza(input)?;
            tracing::info!(name = %pizza.name, "seeded pizza");
        }
        // Materialize the settings singleton.
        self.settings()?;
        Ok(())
    }
}
