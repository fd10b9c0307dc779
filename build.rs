fn main() {
    // Propagate ESP-IDF link arguments and cfgs only for device builds.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
