pixcade::arcade_game!(Frogger, "frogger");
