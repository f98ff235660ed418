pixcade::arcade_game!(Asteroids, "asteroids");
