pixcade::arcade_game!(Invaders, "invaders");
