mod guild;
mod player;
