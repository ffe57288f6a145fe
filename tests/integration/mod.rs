mod hockey;
mod nasa;
mod settings;
