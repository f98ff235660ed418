pixcade::arcade_game!(Breakout, "breakout");
