//! The greeting plugins mounted by the demo application

use crate::app::{App, Fareweller, Greeter};
use scaffold::{Context, Plugin, ScaffoldError};

pub const EN_PLUGIN: &str = "en_plugin-1.0.0";
pub const ES_PLUGIN: &str = "es_plugin-1.0.0";

/// English greetings. Depends on [`EsPlugin`] for its farewell.
#[derive(Debug, Default)]
pub struct EnPlugin;

impl Plugin<App> for EnPlugin {
    fn name(&self) -> &str {
        EN_PLUGIN
    }

    fn mount(&self, ctx: &Context<'_, App>) -> Result<(), ScaffoldError> {
        ctx.app().on_run().add(|greeter: &mut Greeter| {
            greeter.greetings.push("hello".to_string());
            Ok(())
        });
        ctx.lazy(ES_PLUGIN)?;
        // Registered after the dependency, so it says goodbye last
        ctx.app().on_close().add(|fareweller: &mut Fareweller| {
            fareweller.salutations.push("goodbye".to_string());
            Ok(())
        });
        Ok(())
    }
}

/// Spanish greetings
#[derive(Debug, Default)]
pub struct EsPlugin;

impl Plugin<App> for EsPlugin {
    fn name(&self) -> &str {
        ES_PLUGIN
    }

    fn mount(&self, ctx: &Context<'_, App>) -> Result<(), ScaffoldError> {
        ctx.app().on_run().add(|greeter: &mut Greeter| {
            greeter.greetings.push("hola".to_string());
            Ok(())
        });
        ctx.app().on_close().add(|fareweller: &mut Fareweller| {
            fareweller.salutations.push("adios".to_string());
            Ok(())
        });
        Ok(())
    }
}
