fn main() {
    // ESP-IDF build environment plumbing. Only present when the espidf
    // feature (and therefore embuild) is enabled; host builds need nothing.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
