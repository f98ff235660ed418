pixcade::arcade_game!(Snake, "snake");
